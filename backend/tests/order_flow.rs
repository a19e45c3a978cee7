//! End-to-end coverage of the order workflow over the HTTP surface.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use uuid::Uuid;

use backend::domain::ports::ObjectStore;
use backend::server::build_app;
use support::{app_dependencies, send};

fn basic_info_body() -> Value {
    json!({
        "associationName": "Brf Solhöjden",
        "associationType": "brf",
        "address": "Exempelgatan 1",
        "customerEmail": "a@b.se"
    })
}

#[actix_web::test]
async fn the_worked_example_submits_without_a_logo() {
    let (deps, _stores) = app_dependencies();
    let app = test::init_service(build_app(deps)).await;
    let mut cookie = None;

    // Fresh visitors start at the first step.
    let res = send(&app, test::TestRequest::get().uri("/api/v1/order"), &mut cookie).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["state"], json!("collecting_basic_info"));

    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/basic-info")
            .set_json(basic_info_body()),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["state"], json!("collecting_content_choices"));

    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/content")
            .set_json(json!({ "selectedSections": ["intro", "rules"] })),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["state"], json!("reviewing_and_confirming"));

    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/submit")
            .set_json(json!({})),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["order"]["associationName"], json!("Brf Solhöjden"));
    assert_eq!(body["order"]["logoUrl"], json!(null));
    assert_eq!(body["order"]["paymentStatus"], json!("pending"));
    assert_eq!(body["order"]["paymentId"], json!(null));
    assert_eq!(body["order"]["version"], json!(1));
    assert_eq!(body["product"]["price"], json!(299));
    let id = body["order"]["id"].as_str().expect("record id").to_owned();

    // The workflow is terminal and remembers the identifier.
    let res = send(&app, test::TestRequest::get().uri("/api/v1/order"), &mut cookie).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["state"], json!("submitted"));
    assert_eq!(body["recordId"], json!(id));

    // The confirmation view re-reads the persisted record.
    let res = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/orders/{id}")),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["order"]["associationName"], json!("Brf Solhöjden"));
    assert_eq!(body["order"]["paymentStatus"], json!("pending"));
    assert_eq!(body["deliveryEmail"], json!("a@b.se"));
    assert_eq!(body["product"]["name"], json!("Föreningshandboken"));
}

#[actix_web::test]
async fn missing_mandatory_fields_keep_the_first_step() {
    let (deps, _stores) = app_dependencies();
    let app = test::init_service(build_app(deps)).await;
    let mut cookie = None;

    let mut incomplete = basic_info_body();
    incomplete["address"] = json!("");
    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/basic-info")
            .set_json(incomplete),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("validation"));
    assert_eq!(body["details"]["field"], json!("address"));

    let res = send(&app, test::TestRequest::get().uri("/api/v1/order"), &mut cookie).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["state"], json!("collecting_basic_info"));
    assert_eq!(body["basicInfo"], json!(null), "no partial save on violation");
}

#[actix_web::test]
async fn empty_selection_blocks_submission_until_sections_are_ticked() {
    let (deps, _stores) = app_dependencies();
    let app = test::init_service(build_app(deps)).await;
    let mut cookie = None;

    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/basic-info")
            .set_json(basic_info_body()),
        &mut cookie,
    )
    .await;
    // The content boundary is unguarded: an empty selection passes.
    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/content")
            .set_json(json!({ "selectedSections": [] })),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/submit")
            .set_json(json!({})),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("validation"));
    assert_eq!(body["details"]["field"], json!("selectedSections"));

    // Still reviewing; step back, tick a section, and the same action succeeds.
    let res = send(&app, test::TestRequest::get().uri("/api/v1/order"), &mut cookie).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["state"], json!("reviewing_and_confirming"));

    send(&app, test::TestRequest::post().uri("/api/v1/order/back"), &mut cookie).await;
    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/content")
            .set_json(json!({ "selectedSections": ["economy"] })),
        &mut cookie,
    )
    .await;
    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/submit")
            .set_json(json!({})),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn submitting_with_a_logo_uploads_and_references_the_blob() {
    let (deps, stores) = app_dependencies();
    let app = test::init_service(build_app(deps)).await;
    let mut cookie = None;

    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/basic-info")
            .set_json(basic_info_body()),
        &mut cookie,
    )
    .await;
    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/content")
            .set_json(json!({ "selectedSections": ["intro"] })),
        &mut cookie,
    )
    .await;

    let logo_bytes = vec![0x89_u8, 0x50, 0x4e, 0x47];
    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/submit")
            .set_json(json!({
                "logo": {
                    "fileName": "logga.png",
                    "contentType": "image/png",
                    "contentBase64": BASE64.encode(&logo_bytes)
                }
            })),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let logo_url = body["order"]["logoUrl"].as_str().expect("logo reference");

    let stored = stores.objects.list("logos/").await.expect("list");
    assert_eq!(stored.len(), 1);
    let stored_name = &stored.first().expect("one object").name;
    assert!(logo_url.ends_with(stored_name));
    assert_eq!(stored.first().expect("one object").size, Some(4));
}

#[actix_web::test]
async fn malformed_logo_payloads_never_reach_the_stores() {
    let (deps, stores) = app_dependencies();
    let app = test::init_service(build_app(deps)).await;
    let mut cookie = None;

    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/basic-info")
            .set_json(basic_info_body()),
        &mut cookie,
    )
    .await;
    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/content")
            .set_json(json!({ "selectedSections": ["intro"] })),
        &mut cookie,
    )
    .await;

    let res = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/submit")
            .set_json(json!({
                "logo": {
                    "fileName": "logga.png",
                    "contentType": "image/png",
                    "contentBase64": "not base64!!!"
                }
            })),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(stores.objects.list("").await.expect("list").is_empty());
}

#[actix_web::test]
async fn unknown_identifiers_render_the_not_found_view() {
    let (deps, _stores) = app_dependencies();
    let app = test::init_service(build_app(deps)).await;
    let mut cookie = None;

    let res = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/orders/{}", Uuid::new_v4())),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("not_found"));

    // A malformed identifier gets the same presentation.
    let res = send(
        &app,
        test::TestRequest::get().uri("/api/v1/orders/not-a-uuid"),
        &mut cookie,
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn discarding_the_draft_returns_to_the_start() {
    let (deps, _stores) = app_dependencies();
    let app = test::init_service(build_app(deps)).await;
    let mut cookie = None;

    send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/order/basic-info")
            .set_json(basic_info_body()),
        &mut cookie,
    )
    .await;

    let res = send(&app, test::TestRequest::delete().uri("/api/v1/order"), &mut cookie).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = send(&app, test::TestRequest::get().uri("/api/v1/order"), &mut cookie).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["state"], json!("collecting_basic_info"));
    assert_eq!(body["basicInfo"], json!(null));
}

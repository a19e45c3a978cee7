//! Order workflow HTTP handlers.
//!
//! ```text
//! GET    /api/v1/order             current workflow state
//! POST   /api/v1/order/basic-info  step one: association details
//! POST   /api/v1/order/content     step two: sections, notes
//! POST   /api/v1/order/back        step back one state
//! POST   /api/v1/order/submit      create the order (optional logo)
//! DELETE /api/v1/order             discard the draft
//! ```
//!
//! The workflow is stored in the cookie session between requests; each
//! handler loads it, applies one transition, and saves it back.

use actix_web::{delete, get, post, web, HttpResponse};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ContentChoices, Error, LogoUpload, SubmissionWorkflow};
use crate::inbound::http::dto::{
    BasicInfoBody, HandbookBody, ProductBody, SectionBody, parse_custom_information,
    parse_sections,
};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::session::WorkflowSession;
use crate::inbound::http::state::HttpState;

/// Content choices collected in the second workflow step.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentChoicesBody {
    /// Catalog keys of the sections to include.
    #[serde(default)]
    #[schema(example = json!(["intro", "rules"]))]
    pub selected_sections: Vec<String>,
    /// Free-text notes for the handbook producers.
    pub custom_information: Option<String>,
}

/// Base64-encoded logo accompanying the submit action.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoBody {
    /// Original file name.
    #[schema(example = "logga.png")]
    pub file_name: String,
    /// Content type reported by the browser.
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Image bytes, base64 encoded.
    pub content_base64: String,
}

/// Submit request: everything else already lives in the session draft.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    /// Optional logo to upload before the record is created.
    pub logo: Option<LogoBody>,
}

/// Snapshot of the workflow returned after every step.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowBody {
    /// Current state name.
    #[schema(example = "collecting_content_choices")]
    pub state: String,
    /// Identifier of the created record, once submitted.
    pub record_id: Option<Uuid>,
    /// Association details collected so far.
    pub basic_info: Option<BasicInfoBody>,
    /// Sections ticked so far, with display labels.
    pub selected_sections: Vec<SectionBody>,
    /// Notes collected so far.
    pub custom_information: Option<String>,
}

impl From<&SubmissionWorkflow> for WorkflowBody {
    fn from(workflow: &SubmissionWorkflow) -> Self {
        Self {
            state: workflow.state().as_str().to_owned(),
            record_id: workflow.record_id(),
            basic_info: workflow.basic_info().map(BasicInfoBody::from),
            selected_sections: workflow
                .content()
                .selected_sections
                .sections()
                .iter()
                .copied()
                .map(SectionBody::from)
                .collect(),
            custom_information: workflow.content().custom_information.clone(),
        }
    }
}

/// Response to a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseBody {
    /// The persisted order.
    pub order: HandbookBody,
    /// Product display data for the confirmation summary.
    pub product: ProductBody,
}

fn parse_logo(body: LogoBody) -> Result<LogoUpload, Error> {
    if body.file_name.trim().is_empty() {
        return Err(Error::validation("logo file name must not be empty")
            .with_details(json!({ "field": "logo.fileName" })));
    }
    if body.content_type.trim().is_empty() {
        return Err(Error::validation("logo content type must not be empty")
            .with_details(json!({ "field": "logo.contentType" })));
    }
    let bytes = BASE64.decode(body.content_base64.as_bytes()).map_err(|_| {
        Error::validation("logo payload is not valid base64")
            .with_details(json!({ "field": "logo.contentBase64" }))
    })?;
    if bytes.is_empty() {
        return Err(Error::validation("logo payload is empty")
            .with_details(json!({ "field": "logo.contentBase64" })));
    }
    Ok(LogoUpload {
        file_name: body.file_name,
        content_type: body.content_type,
        bytes,
    })
}

/// Inspect the current workflow state.
#[utoipa::path(
    get,
    path = "/api/v1/order",
    responses(
        (status = 200, description = "Current workflow snapshot", body = WorkflowBody)
    ),
    tags = ["order"],
    operation_id = "getOrderWorkflow"
)]
#[get("/order")]
pub async fn get_workflow(session: WorkflowSession) -> ApiResult<web::Json<WorkflowBody>> {
    let workflow = session.load();
    Ok(web::Json(WorkflowBody::from(&workflow)))
}

/// Record association details and advance to the content step.
#[utoipa::path(
    post,
    path = "/api/v1/order/basic-info",
    request_body = BasicInfoBody,
    responses(
        (status = 200, description = "Details accepted", body = WorkflowBody),
        (status = 400, description = "A mandatory field is missing", body = ApiError)
    ),
    tags = ["order"],
    operation_id = "enterBasicInfo"
)]
#[post("/order/basic-info")]
pub async fn enter_basic_info(
    session: WorkflowSession,
    payload: web::Json<BasicInfoBody>,
) -> ApiResult<web::Json<WorkflowBody>> {
    let mut workflow = session.load();
    let info = payload.into_inner().into_domain()?;
    workflow.enter_basic_info(info)?;
    session.save(&workflow)?;
    Ok(web::Json(WorkflowBody::from(&workflow)))
}

/// Record content choices and advance to the review step.
#[utoipa::path(
    post,
    path = "/api/v1/order/content",
    request_body = ContentChoicesBody,
    responses(
        (status = 200, description = "Choices accepted", body = WorkflowBody),
        (status = 400, description = "Unknown section key or oversized notes", body = ApiError)
    ),
    tags = ["order"],
    operation_id = "enterContentChoices"
)]
#[post("/order/content")]
pub async fn enter_content_choices(
    session: WorkflowSession,
    payload: web::Json<ContentChoicesBody>,
) -> ApiResult<web::Json<WorkflowBody>> {
    let mut workflow = session.load();
    let body = payload.into_inner();
    let content = ContentChoices {
        selected_sections: parse_sections(body.selected_sections)?,
        custom_information: parse_custom_information(body.custom_information)?,
    };
    workflow.enter_content_choices(content)?;
    session.save(&workflow)?;
    Ok(web::Json(WorkflowBody::from(&workflow)))
}

/// Step back one state without validation.
#[utoipa::path(
    post,
    path = "/api/v1/order/back",
    responses(
        (status = 200, description = "Stepped back", body = WorkflowBody),
        (status = 400, description = "Nothing to go back to", body = ApiError)
    ),
    tags = ["order"],
    operation_id = "stepBack"
)]
#[post("/order/back")]
pub async fn step_back(session: WorkflowSession) -> ApiResult<web::Json<WorkflowBody>> {
    let mut workflow = session.load();
    workflow.step_back()?;
    session.save(&workflow)?;
    Ok(web::Json(WorkflowBody::from(&workflow)))
}

/// Submit the order: optionally upload the logo, then create the record.
///
/// On failure the workflow lands in `submission_failed` and the same call
/// can be issued again; nothing is retried automatically.
#[utoipa::path(
    post,
    path = "/api/v1/order/submit",
    request_body = SubmitBody,
    responses(
        (status = 200, description = "Order created", body = SubmitResponseBody),
        (status = 400, description = "Empty section selection or malformed logo", body = ApiError),
        (status = 502, description = "A store rejected the submission", body = ApiError)
    ),
    tags = ["order"],
    operation_id = "submitOrder"
)]
#[post("/order/submit")]
pub async fn submit(
    state: web::Data<HttpState>,
    session: WorkflowSession,
    payload: web::Json<SubmitBody>,
) -> ApiResult<web::Json<SubmitResponseBody>> {
    let mut workflow = session.load();
    let logo = payload.into_inner().logo.map(parse_logo).transpose()?;

    let result = state.submission.submit(&mut workflow, logo).await;
    // Persist the outcome either way: submitted on success, retriable
    // submission_failed on error.
    session.save(&workflow)?;

    let record = result.map_err(ApiError::from)?;
    Ok(web::Json(SubmitResponseBody {
        order: HandbookBody::from(record),
        product: ProductBody::from(&state.product),
    }))
}

/// Discard the draft and return to the start.
#[utoipa::path(
    delete,
    path = "/api/v1/order",
    responses(
        (status = 204, description = "Draft discarded")
    ),
    tags = ["order"],
    operation_id = "resetOrderWorkflow"
)]
#[delete("/order")]
pub async fn reset(session: WorkflowSession) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

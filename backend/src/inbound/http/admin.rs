//! Administrative probe handlers.
//!
//! ```text
//! GET    /api/v1/admin/handbooks              paginated listing
//! POST   /api/v1/admin/handbooks              create a record directly
//! PATCH  /api/v1/admin/handbooks/{id}         typed partial update
//! POST   /api/v1/admin/handbooks/{id}/payment record a payment event
//! GET    /api/v1/admin/storage                list stored objects
//! POST   /api/v1/admin/storage                upload an object
//! DELETE /api/v1/admin/storage/{path}         delete an object
//! ```
//!
//! Manual exercise surfaces for the two store clients. They consume the
//! same port contracts and the same typed draft/partial structures as the
//! order workflow; there is no loosely-typed payload here.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use pagination::{DEFAULT_LIMIT, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, HandbookDraft, HandbookUpdate};
use crate::inbound::http::dto::{
    BasicInfoBody, HandbookBody, ObjectMetadataBody, StoredObjectBody, parse_custom_information,
    parse_payment_status, parse_sections,
};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Listing window for the handbook probe.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Page size; defaults to the shared pagination default.
    pub limit: Option<u32>,
    /// Rows to skip; defaults to zero.
    pub offset: Option<u32>,
}

/// One page of handbook orders with the exact total.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandbookPageBody {
    /// Orders inside the requested window, newest first.
    pub items: Vec<HandbookBody>,
    /// Exact number of orders across all pages.
    pub total: u64,
}

/// Direct-create request for the handbook probe.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateBody {
    /// Association details, as in the order workflow's first step.
    pub basic_info: BasicInfoBody,
    /// Catalog keys of the sections to include.
    pub selected_sections: Vec<String>,
    /// Free-text notes.
    pub custom_information: Option<String>,
    /// Pre-existing logo reference, if any.
    pub logo_url: Option<String>,
}

/// Typed partial update for the handbook probe. Identifier, timestamps,
/// and version cannot be expressed here.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdminUpdateBody {
    /// Replacement association name.
    pub association_name: Option<String>,
    /// Replacement association category key.
    pub association_type: Option<String>,
    /// Replacement street address.
    pub address: Option<String>,
    /// Replacement postal code.
    pub zip_code: Option<String>,
    /// Replacement city.
    pub city: Option<String>,
    /// Replacement contact person.
    pub contact_person: Option<String>,
    /// Replacement contact email.
    pub contact_email: Option<String>,
    /// Replacement contact phone.
    pub contact_phone: Option<String>,
    /// Replacement customer email.
    pub customer_email: Option<String>,
    /// Replacement section selection.
    pub selected_sections: Option<Vec<String>>,
    /// Replacement free-text notes.
    pub custom_information: Option<String>,
    /// Replacement logo reference.
    pub logo_url: Option<String>,
    /// Generated-document reference.
    pub pdf_url: Option<String>,
    /// Published-site reference.
    pub site_url: Option<String>,
    /// Payment status key.
    pub payment_status: Option<String>,
    /// Payment reference identifier.
    pub payment_id: Option<String>,
}

impl AdminUpdateBody {
    fn into_domain(self) -> Result<HandbookUpdate, Error> {
        let association_category = self
            .association_type
            .as_deref()
            .map(|key| {
                crate::domain::AssociationCategory::from_key(key).ok_or_else(|| {
                    Error::validation(format!("unknown association category: {key}"))
                        .with_details(json!({ "field": "associationType", "value": key }))
                })
            })
            .transpose()?;
        let selected_sections = self.selected_sections.map(parse_sections).transpose()?;
        let payment_status = self
            .payment_status
            .as_deref()
            .map(parse_payment_status)
            .transpose()?;

        Ok(HandbookUpdate {
            association_name: self.association_name,
            association_category,
            address: self.address,
            zip_code: self.zip_code,
            city: self.city,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            customer_email: self.customer_email,
            selected_sections,
            custom_information: self.custom_information,
            logo_url: self.logo_url,
            pdf_url: self.pdf_url,
            site_url: self.site_url,
            payment_status,
            payment_id: self.payment_id,
        })
    }
}

/// Payment event recorded by the external payment-completion process.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEventBody {
    /// Payment reference identifier from the gateway.
    #[schema(example = "pi_3MtwBwLkdIwHu7ix28a3tqPa")]
    pub payment_id: String,
    /// Payment status key: `pending`, `processing`, `completed`, `failed`.
    #[schema(example = "completed")]
    pub status: String,
}

/// Prefix filter for the storage probe listing.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct StorageQuery {
    /// Path prefix; empty lists the whole bucket.
    pub prefix: Option<String>,
}

/// Direct-upload request for the storage probe.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadObjectBody {
    /// Target path inside the bucket.
    #[schema(example = "logos/1746000000000_logga.png")]
    pub path: String,
    /// Content type of the object.
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Object bytes, base64 encoded.
    pub content_base64: String,
}

fn page_request(query: ListQuery) -> Result<PageRequest, Error> {
    PageRequest::new(
        query.limit.unwrap_or(DEFAULT_LIMIT),
        query.offset.unwrap_or(0),
    )
    .map_err(|source| {
        Error::validation(source.to_string()).with_details(json!({ "field": "limit" }))
    })
}

/// List handbook orders, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/handbooks",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of orders", body = HandbookPageBody),
        (status = 400, description = "Illegal page window", body = ApiError),
        (status = 502, description = "Record store failure", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "listHandbooks"
)]
#[get("/admin/handbooks")]
pub async fn list_handbooks(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<HandbookPageBody>> {
    let page = page_request(query.into_inner()).map_err(ApiError::from)?;
    let listed = state
        .records
        .list(page)
        .await
        .map_err(Error::from)?;
    let page_body = HandbookPageBody {
        total: listed.total,
        items: listed.items.into_iter().map(HandbookBody::from).collect(),
    };
    Ok(web::Json(page_body))
}

/// Create a handbook order directly through the record store port.
#[utoipa::path(
    post,
    path = "/api/v1/admin/handbooks",
    request_body = AdminCreateBody,
    responses(
        (status = 200, description = "The persisted order", body = HandbookBody),
        (status = 400, description = "Invalid draft", body = ApiError),
        (status = 502, description = "Record store failure", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "createHandbook"
)]
#[post("/admin/handbooks")]
pub async fn create_handbook(
    state: web::Data<HttpState>,
    payload: web::Json<AdminCreateBody>,
) -> ApiResult<web::Json<HandbookBody>> {
    let body = payload.into_inner();
    let draft = HandbookDraft::new(
        body.basic_info.into_domain()?,
        parse_sections(body.selected_sections)?,
        parse_custom_information(body.custom_information)?,
        body.logo_url,
    )?;
    let record = state.records.create(&draft).await.map_err(Error::from)?;
    Ok(web::Json(HandbookBody::from(record)))
}

/// Apply a typed partial update to an order.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/handbooks/{id}",
    params(("id" = Uuid, Path, description = "Record identifier")),
    request_body = AdminUpdateBody,
    responses(
        (status = 200, description = "The updated order", body = HandbookBody),
        (status = 400, description = "Empty or invalid update", body = ApiError),
        (status = 404, description = "Unknown identifier", body = ApiError),
        (status = 502, description = "Record store failure", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "updateHandbook"
)]
#[patch("/admin/handbooks/{id}")]
pub async fn update_handbook(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<AdminUpdateBody>,
) -> ApiResult<web::Json<HandbookBody>> {
    let update = payload.into_inner().into_domain()?;
    if update.is_empty() {
        return Err(ApiError::from(Error::validation(
            "update must set at least one field",
        )));
    }
    let record = state
        .records
        .update(path.into_inner(), &update)
        .await
        .map_err(Error::from)?;
    Ok(web::Json(HandbookBody::from(record)))
}

/// Record a payment event against an order.
#[utoipa::path(
    post,
    path = "/api/v1/admin/handbooks/{id}/payment",
    params(("id" = Uuid, Path, description = "Record identifier")),
    request_body = PaymentEventBody,
    responses(
        (status = 200, description = "The updated order", body = HandbookBody),
        (status = 400, description = "Unknown payment status", body = ApiError),
        (status = 404, description = "Unknown identifier", body = ApiError),
        (status = 502, description = "Record store failure", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "recordPaymentEvent"
)]
#[post("/admin/handbooks/{id}/payment")]
pub async fn record_payment(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<PaymentEventBody>,
) -> ApiResult<web::Json<HandbookBody>> {
    let body = payload.into_inner();
    let status = parse_payment_status(&body.status)?;
    let update = HandbookUpdate::payment_event(body.payment_id, status);
    let record = state
        .records
        .update(path.into_inner(), &update)
        .await
        .map_err(Error::from)?;
    Ok(web::Json(HandbookBody::from(record)))
}

/// List stored objects under a prefix.
#[utoipa::path(
    get,
    path = "/api/v1/admin/storage",
    params(StorageQuery),
    responses(
        (status = 200, description = "Object metadata", body = [ObjectMetadataBody]),
        (status = 502, description = "Object store failure", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "listObjects"
)]
#[get("/admin/storage")]
pub async fn list_objects(
    state: web::Data<HttpState>,
    query: web::Query<StorageQuery>,
) -> ApiResult<web::Json<Vec<ObjectMetadataBody>>> {
    let prefix = query.into_inner().prefix.unwrap_or_default();
    let objects = state.objects.list(&prefix).await.map_err(Error::from)?;
    Ok(web::Json(
        objects.into_iter().map(ObjectMetadataBody::from).collect(),
    ))
}

/// Upload an object directly through the object store port.
#[utoipa::path(
    post,
    path = "/api/v1/admin/storage",
    request_body = UploadObjectBody,
    responses(
        (status = 200, description = "Stored path and public URL", body = StoredObjectBody),
        (status = 400, description = "Malformed upload request", body = ApiError),
        (status = 502, description = "Object store failure", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "uploadObject"
)]
#[post("/admin/storage")]
pub async fn upload_object(
    state: web::Data<HttpState>,
    payload: web::Json<UploadObjectBody>,
) -> ApiResult<web::Json<StoredObjectBody>> {
    let body = payload.into_inner();
    if body.path.trim().is_empty() {
        return Err(ApiError::from(
            Error::validation("object path must not be empty")
                .with_details(json!({ "field": "path" })),
        ));
    }
    let bytes = BASE64.decode(body.content_base64.as_bytes()).map_err(|_| {
        ApiError::from(
            Error::validation("object payload is not valid base64")
                .with_details(json!({ "field": "contentBase64" })),
        )
    })?;
    let stored = state
        .objects
        .upload(&body.path, &body.content_type, bytes)
        .await
        .map_err(Error::from)?;
    Ok(web::Json(StoredObjectBody::from(stored)))
}

/// Delete an object; a missing path deletes successfully.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/storage/{path}",
    params(("path" = String, Path, description = "Object path inside the bucket")),
    responses(
        (status = 204, description = "Object gone"),
        (status = 502, description = "Object store failure", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "deleteObject"
)]
#[delete("/admin/storage/{path:.*}")]
pub async fn delete_object(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state
        .objects
        .delete(&path.into_inner())
        .await
        .map_err(Error::from)?;
    Ok(HttpResponse::NoContent().finish())
}

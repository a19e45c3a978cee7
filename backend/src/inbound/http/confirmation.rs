//! Confirmation HTTP handler.
//!
//! ```text
//! GET /api/v1/orders/{id}
//! ```
//!
//! Addressed by the record identifier the submit response exposes; the
//! not-found presentation covers both a missing record and a store
//! failure, and a malformed identifier gets the same treatment.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ConfirmationOutcome, Error};
use crate::inbound::http::dto::{HandbookBody, ProductBody};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Order summary rendered on the confirmation view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationBody {
    /// The persisted order.
    pub order: HandbookBody,
    /// Product display data (name, price, currency).
    pub product: ProductBody,
    /// Email address the delivery notifications go to.
    pub delivery_email: String,
}

fn not_found() -> ApiError {
    ApiError::from(Error::not_found("handbook not found"))
}

/// Fetch the confirmation summary for an order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Record identifier from the submit response")),
    responses(
        (status = 200, description = "Order summary", body = ConfirmationBody),
        (status = 404, description = "Unknown identifier or store unavailable", body = ApiError)
    ),
    tags = ["order"],
    operation_id = "getConfirmation"
)]
#[get("/orders/{id}")]
pub async fn get_confirmation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ConfirmationBody>> {
    let Ok(id) = Uuid::parse_str(&path.into_inner()) else {
        return Err(not_found());
    };

    match state.confirmation.fetch(id).await {
        ConfirmationOutcome::Found(record) => {
            let order = HandbookBody::from(*record);
            let delivery_email = order.customer_email.clone();
            Ok(web::Json(ConfirmationBody {
                order,
                product: ProductBody::from(&state.product),
                delivery_email,
            }))
        }
        ConfirmationOutcome::NotFound => Err(not_found()),
    }
}

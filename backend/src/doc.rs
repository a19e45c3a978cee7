//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and schema of the order
//! workflow, the confirmation view, the administrative probes, and the
//! health probes. The generated specification backs Swagger UI in debug
//! builds.

use utoipa::OpenApi;

use crate::inbound::http::admin::{
    AdminCreateBody, AdminUpdateBody, HandbookPageBody, PaymentEventBody, UploadObjectBody,
};
use crate::inbound::http::confirmation::ConfirmationBody;
use crate::inbound::http::dto::{
    BasicInfoBody, HandbookBody, ObjectMetadataBody, ProductBody, SectionBody, StoredObjectBody,
};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::order::{
    ContentChoicesBody, LogoBody, SubmitBody, SubmitResponseBody, WorkflowBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Föreningshandboken order API",
        description = "Order workflow, confirmation view, and store probes \
                       for the housing-association handbook product."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::order::get_workflow,
        crate::inbound::http::order::enter_basic_info,
        crate::inbound::http::order::enter_content_choices,
        crate::inbound::http::order::step_back,
        crate::inbound::http::order::submit,
        crate::inbound::http::order::reset,
        crate::inbound::http::confirmation::get_confirmation,
        crate::inbound::http::admin::list_handbooks,
        crate::inbound::http::admin::create_handbook,
        crate::inbound::http::admin::update_handbook,
        crate::inbound::http::admin::record_payment,
        crate::inbound::http::admin::list_objects,
        crate::inbound::http::admin::upload_object,
        crate::inbound::http::admin::delete_object,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        BasicInfoBody,
        ContentChoicesBody,
        LogoBody,
        SubmitBody,
        SubmitResponseBody,
        WorkflowBody,
        ConfirmationBody,
        HandbookBody,
        SectionBody,
        ProductBody,
        HandbookPageBody,
        AdminCreateBody,
        AdminUpdateBody,
        PaymentEventBody,
        UploadObjectBody,
        StoredObjectBody,
        ObjectMetadataBody,
    )),
    tags(
        (name = "order", description = "The multi-step order workflow and confirmation view"),
        (name = "admin", description = "Manual probes for the record and object store clients"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn registers_the_order_workflow_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/order",
            "/api/v1/order/basic-info",
            "/api/v1/order/content",
            "/api/v1/order/submit",
            "/api/v1/orders/{id}",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "OpenAPI document should describe {path}"
            );
        }
    }

    #[test]
    fn registers_the_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.schemas.contains_key("ApiError"));
        assert!(components.schemas.contains_key("HandbookBody"));
    }
}

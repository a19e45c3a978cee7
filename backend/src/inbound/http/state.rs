//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and services, and remain testable without any
//! hosted store: tests inject the in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{ObjectStore, RecordStore};
use crate::domain::{ConfirmationService, SubmissionService};
use crate::server::config::ProductInfo;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Record store port, used directly by the administrative probes.
    pub records: Arc<dyn RecordStore>,
    /// Object store port, used directly by the administrative probes.
    pub objects: Arc<dyn ObjectStore>,
    /// Submission use-case driving the workflow's side effects.
    pub submission: Arc<SubmissionService>,
    /// Confirmation lookup use-case.
    pub confirmation: Arc<ConfirmationService>,
    /// Product display data for order summaries.
    pub product: ProductInfo,
}

impl HttpState {
    /// Wire the services over the two store ports.
    pub fn new(
        records: Arc<dyn RecordStore>,
        objects: Arc<dyn ObjectStore>,
        product: ProductInfo,
    ) -> Self {
        let submission = Arc::new(SubmissionService::new(records.clone(), objects.clone()));
        let confirmation = Arc::new(ConfirmationService::new(records.clone()));
        Self {
            records,
            objects,
            submission,
            confirmation,
            product,
        }
    }
}

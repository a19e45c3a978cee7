//! Confirmation retrieval for the post-submission order view.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use super::handbook::HandbookRecord;
use super::ports::{RecordStore, RecordStoreError};

/// Terminal outcomes of a confirmation lookup.
///
/// The confirmation view does not distinguish "never existed" from
/// "backend unavailable": both collapse into [`ConfirmationOutcome::NotFound`].
/// Backend failures are logged before the collapse so the distinction
/// survives in the logs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationOutcome {
    /// The record exists; render its summary.
    Found(Box<HandbookRecord>),
    /// Nothing to render; offer a path back to the start.
    NotFound,
}

/// Fetches the persisted record behind a confirmation view.
pub struct ConfirmationService {
    records: Arc<dyn RecordStore>,
}

impl ConfirmationService {
    /// Build the service over the record store port.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Look up the record for a confirmation view.
    pub async fn fetch(&self, id: Uuid) -> ConfirmationOutcome {
        match self.records.get_by_id(id).await {
            Ok(record) => ConfirmationOutcome::Found(Box::new(record)),
            Err(RecordStoreError::NotFound { .. }) => ConfirmationOutcome::NotFound,
            Err(source) => {
                error!(error = %source, %id, "confirmation lookup failed");
                ConfirmationOutcome::NotFound
            }
        }
    }
}

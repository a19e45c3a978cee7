//! Port abstraction for the hosted record store holding handbook orders.
//!
//! Every operation is a single round trip; adapters attempt no retries and
//! keep no local cache. Failures carry a descriptive message and are logged
//! by the adapter before being surfaced.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{HandbookDraft, HandbookRecord, HandbookUpdate};

/// Failures raised by record store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordStoreError {
    /// No row matches the identifier.
    #[error("handbook {id} not found")]
    NotFound {
        /// The identifier that matched nothing.
        id: Uuid,
    },
    /// A unique identifier matched more than one row; the table is in an
    /// unexpected state.
    #[error("identifier {id} matched {matches} rows")]
    AmbiguousIdentifier {
        /// The identifier that was queried.
        id: Uuid,
        /// How many rows came back.
        matches: usize,
    },
    /// The backend rejected the operation: constraint violation, quota,
    /// or connectivity failure.
    #[error("record store request failed: {message}")]
    Backend {
        /// Adapter-provided description of the rejection.
        message: String,
    },
    /// The backend answered with a payload this adapter cannot decode.
    #[error("record store payload could not be decoded: {message}")]
    Decode {
        /// What failed to decode.
        message: String,
    },
}

impl RecordStoreError {
    /// Backend rejection with a descriptive message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Undecodable payload with a descriptive message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Create, read, update, and list handbook orders in the external store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new row; the store assigns identifier, timestamps, and
    /// version 1, and the full persisted row is returned.
    async fn create(&self, draft: &HandbookDraft) -> Result<HandbookRecord, RecordStoreError>;

    /// Fetch the single row matching `id`.
    ///
    /// Zero matches yield [`RecordStoreError::NotFound`]; more than one
    /// yields [`RecordStoreError::AmbiguousIdentifier`].
    async fn get_by_id(&self, id: Uuid) -> Result<HandbookRecord, RecordStoreError>;

    /// Apply a partial field set to the row matching `id` and return the
    /// updated row. Identifier, timestamps, and version are store-owned
    /// and cannot appear in `update`.
    async fn update(
        &self,
        id: Uuid,
        update: &HandbookUpdate,
    ) -> Result<HandbookRecord, RecordStoreError>;

    /// Return a page of rows ordered by creation time descending together
    /// with the exact total count. An offset past the end yields an empty
    /// page, not an error.
    async fn list(&self, page: PageRequest) -> Result<Page<HandbookRecord>, RecordStoreError>;
}

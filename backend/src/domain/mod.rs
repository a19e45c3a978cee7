//! Domain core: entities, the submission workflow, and ports.
//!
//! Everything here is transport agnostic. Inbound adapters translate HTTP
//! requests into these types; outbound adapters implement the ports. Port
//! errors are folded into the domain [`Error`] taxonomy via the `From`
//! impls at the bottom of this module.

pub mod confirmation;
pub mod error;
pub mod handbook;
pub mod ports;
pub mod sections;
pub mod submission;

pub use self::confirmation::{ConfirmationOutcome, ConfirmationService};
pub use self::error::{Error, ErrorCode};
pub use self::handbook::{
    AssociationCategory, BasicInfo, HandbookDraft, HandbookRecord, HandbookUpdate, PaymentStatus,
    MAX_CUSTOM_INFORMATION_CHARS,
};
pub use self::sections::{Section, SectionSelection};
pub use self::submission::{
    ContentChoices, LogoUpload, SubmissionService, SubmissionState, SubmissionWorkflow,
};

use self::ports::{ObjectStoreError, RecordStoreError};

impl From<RecordStoreError> for Error {
    fn from(source: RecordStoreError) -> Self {
        match source {
            RecordStoreError::NotFound { id } => Self::not_found(format!("handbook {id} not found"))
                .with_details(serde_json::json!({ "id": id })),
            other => Self::persistence(other.to_string()),
        }
    }
}

impl From<ObjectStoreError> for Error {
    fn from(source: ObjectStoreError) -> Self {
        Self::storage(source.to_string())
    }
}

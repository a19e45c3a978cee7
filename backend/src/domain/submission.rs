//! The multi-step order submission workflow.
//!
//! [`SubmissionWorkflow`] is an explicit named-state machine that collects
//! the order draft step by step and is small enough to serialise into the
//! session cookie between requests. All guards live on the transitions;
//! the only side effects (logo upload, record create) are confined to
//! [`SubmissionService::submit`].

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use super::handbook::{BasicInfo, HandbookDraft, HandbookRecord};
use super::ports::{ObjectStore, RecordStore};
use super::sections::SectionSelection;
use super::Error;

/// Named workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Step one: association details.
    CollectingBasicInfo,
    /// Step two: section selection, notes, and logo choice.
    CollectingContentChoices,
    /// Step three: summary shown, waiting for the customer to confirm.
    ReviewingAndConfirming,
    /// Side effects in flight.
    Submitting,
    /// Terminal: the record exists and its identifier is known.
    Submitted,
    /// The submit action failed; re-invoking it retries.
    SubmissionFailed,
}

impl SubmissionState {
    /// Wire name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectingBasicInfo => "collecting_basic_info",
            Self::CollectingContentChoices => "collecting_content_choices",
            Self::ReviewingAndConfirming => "reviewing_and_confirming",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::SubmissionFailed => "submission_failed",
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything collected in the content step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentChoices {
    /// Chapter topics the customer ticked.
    pub selected_sections: SectionSelection,
    /// Free-text notes for the handbook producers.
    pub custom_information: Option<String>,
}

/// The submission workflow: current state plus the draft collected so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionWorkflow {
    state: SubmissionState,
    basic_info: Option<BasicInfo>,
    content: ContentChoices,
    record_id: Option<Uuid>,
}

impl SubmissionWorkflow {
    /// Start a fresh workflow at the first step.
    pub const fn new() -> Self {
        Self {
            state: SubmissionState::CollectingBasicInfo,
            basic_info: None,
            content: ContentChoices {
                selected_sections: SectionSelection::empty(),
                custom_information: None,
            },
            record_id: None,
        }
    }

    /// Current state.
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Association details collected so far.
    pub const fn basic_info(&self) -> Option<&BasicInfo> {
        self.basic_info.as_ref()
    }

    /// Content choices collected so far.
    pub const fn content(&self) -> &ContentChoices {
        &self.content
    }

    /// Identifier of the created record once the workflow reaches
    /// [`SubmissionState::Submitted`].
    pub const fn record_id(&self) -> Option<Uuid> {
        self.record_id
    }

    fn wrong_state(&self, action: &str) -> Error {
        Error::validation(format!("cannot {action} while {}", self.state))
            .with_details(json!({ "state": self.state.as_str() }))
    }

    /// Store validated association details and advance to the content step.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] when a mandatory field is empty or
    /// the workflow is not collecting basic info; the state and any
    /// previously stored details remain untouched.
    pub fn enter_basic_info(&mut self, info: BasicInfo) -> Result<(), Error> {
        if self.state != SubmissionState::CollectingBasicInfo {
            return Err(self.wrong_state("enter association details"));
        }
        info.validate()?;
        self.basic_info = Some(info);
        self.state = SubmissionState::CollectingContentChoices;
        Ok(())
    }

    /// Store content choices and advance to the review step.
    ///
    /// This boundary is unguarded: an empty selection may pass through and
    /// is only rejected when submission begins.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] when the workflow is not collecting
    /// content choices.
    pub fn enter_content_choices(&mut self, content: ContentChoices) -> Result<(), Error> {
        if self.state != SubmissionState::CollectingContentChoices {
            return Err(self.wrong_state("choose handbook content"));
        }
        self.content = content;
        self.state = SubmissionState::ReviewingAndConfirming;
        Ok(())
    }

    /// Step back one state. Backward transitions carry no validation; from
    /// the first step this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] from the terminal and in-flight
    /// states, where there is nothing to go back to.
    pub fn step_back(&mut self) -> Result<(), Error> {
        self.state = match self.state {
            SubmissionState::CollectingBasicInfo => SubmissionState::CollectingBasicInfo,
            SubmissionState::CollectingContentChoices => SubmissionState::CollectingBasicInfo,
            SubmissionState::ReviewingAndConfirming | SubmissionState::SubmissionFailed => {
                SubmissionState::CollectingContentChoices
            }
            SubmissionState::Submitting | SubmissionState::Submitted => {
                return Err(self.wrong_state("step back"));
            }
        };
        Ok(())
    }

    /// Guard the transition into [`SubmissionState::Submitting`].
    ///
    /// Allowed from review (first attempt) and from
    /// [`SubmissionState::SubmissionFailed`] (manual retry).
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] when the section selection is empty
    /// or the workflow is in any other state; on violation the state is
    /// unchanged.
    pub fn begin_submission(&mut self) -> Result<(), Error> {
        if !matches!(
            self.state,
            SubmissionState::ReviewingAndConfirming | SubmissionState::SubmissionFailed
        ) {
            return Err(self.wrong_state("submit"));
        }
        if self.content.selected_sections.is_empty() {
            return Err(Error::validation(
                "at least one handbook section must be selected",
            )
            .with_details(json!({ "field": "selectedSections" })));
        }
        self.state = SubmissionState::Submitting;
        Ok(())
    }

    /// Assemble the insert payload from the collected pieces.
    fn assemble_draft(&self, logo_url: Option<String>) -> Result<HandbookDraft, Error> {
        let basic = self
            .basic_info
            .clone()
            .ok_or_else(|| Error::internal("submitting without association details"))?;
        HandbookDraft::new(
            basic,
            self.content.selected_sections.clone(),
            self.content.custom_information.clone(),
            logo_url,
        )
    }

    /// Record a successful submission.
    fn complete(&mut self, record_id: Uuid) {
        self.record_id = Some(record_id);
        self.state = SubmissionState::Submitted;
    }

    /// Record a failed submission; the action can be re-invoked.
    fn fail(&mut self) {
        self.state = SubmissionState::SubmissionFailed;
    }
}

impl Default for SubmissionWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

/// A logo image accompanying the submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoUpload {
    /// Original file name, used as the tail of the object path.
    pub file_name: String,
    /// Content type reported by the customer's browser.
    pub content_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

/// Build a collision-resistant object path for a logo upload.
///
/// The path is prefixed with a millisecond timestamp; the file name is
/// reduced to a conservative character set. No uniqueness is enforced
/// beyond the store's upsert behaviour.
fn logo_object_path(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("logos/{}_{safe}", Utc::now().timestamp_millis())
}

/// Performs the submit action: the only place in the workflow with
/// irreversible external side effects.
///
/// Both the blob write and the row insert are attempted once, with no
/// automatic retry and no rollback: if the record create fails after a
/// successful logo upload, the blob is left orphaned (and logged).
pub struct SubmissionService {
    records: Arc<dyn RecordStore>,
    objects: Arc<dyn ObjectStore>,
}

impl SubmissionService {
    /// Build the service over the two store ports.
    pub fn new(records: Arc<dyn RecordStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { records, objects }
    }

    /// Drive the workflow through `submitting` into `submitted` or
    /// `submission_failed`.
    ///
    /// On success the workflow exposes the new record identifier and the
    /// persisted record is returned.
    ///
    /// # Errors
    ///
    /// Returns the guard's validation [`Error`] without touching any
    /// store, a storage [`Error`] when the logo upload fails, or a
    /// persistence [`Error`] when the record create fails.
    pub async fn submit(
        &self,
        workflow: &mut SubmissionWorkflow,
        logo: Option<LogoUpload>,
    ) -> Result<HandbookRecord, Error> {
        workflow.begin_submission()?;

        let logo_url = match logo {
            Some(logo) => {
                let path = logo_object_path(&logo.file_name);
                match self
                    .objects
                    .upload(&path, &logo.content_type, logo.bytes)
                    .await
                {
                    Ok(stored) => Some(stored),
                    Err(source) => {
                        error!(error = %source, path, "logo upload failed");
                        workflow.fail();
                        return Err(Error::from(source));
                    }
                }
            }
            None => None,
        };

        let draft = match workflow.assemble_draft(logo_url.as_ref().map(|stored| stored.url.clone()))
        {
            Ok(draft) => draft,
            Err(source) => {
                // Leave the workflow retriable rather than stranded in
                // `submitting`.
                workflow.fail();
                return Err(source);
            }
        };
        match self.records.create(&draft).await {
            Ok(record) => {
                workflow.complete(record.id);
                Ok(record)
            }
            Err(source) => {
                if let Some(stored) = &logo_url {
                    // No compensating delete: the blob stays behind for an
                    // operator to reconcile.
                    warn!(path = %stored.path, "record create failed after logo upload; blob orphaned");
                }
                error!(error = %source, "handbook record create failed");
                workflow.fail();
                Err(Error::from(source))
            }
        }
    }
}

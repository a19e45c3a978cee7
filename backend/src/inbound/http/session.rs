//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The submission workflow lives in the cookie session between steps.
//! This wrapper owns the (de)serialisation so handlers only deal with
//! [`SubmissionWorkflow`] values.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SubmissionWorkflow};
use crate::inbound::http::error::ApiError;

pub(crate) const WORKFLOW_KEY: &str = "order_workflow";

/// Newtype wrapper exposing workflow-level session operations.
#[derive(Clone)]
pub struct WorkflowSession(Session);

impl WorkflowSession {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Fetch the workflow stored in the session, or a fresh one when the
    /// session carries none. A cookie that no longer deserialises (e.g.
    /// after a deployment changed the draft shape) is treated as absent.
    pub fn load(&self) -> SubmissionWorkflow {
        match self.0.get::<SubmissionWorkflow>(WORKFLOW_KEY) {
            Ok(Some(workflow)) => workflow,
            Ok(None) => SubmissionWorkflow::new(),
            Err(source) => {
                warn!(error = %source, "stale workflow cookie; starting over");
                SubmissionWorkflow::new()
            }
        }
    }

    /// Persist the workflow into the session cookie.
    pub fn save(&self, workflow: &SubmissionWorkflow) -> Result<(), ApiError> {
        self.0
            .insert(WORKFLOW_KEY, workflow)
            .map_err(|source| {
                ApiError::from(Error::internal(format!(
                    "failed to persist the order draft: {source}"
                )))
            })
    }

    /// Drop the stored workflow, returning the customer to the start.
    pub fn clear(&self) {
        self.0.remove(WORKFLOW_KEY);
    }
}

impl FromRequest for WorkflowSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(WorkflowSession::new) })
    }
}

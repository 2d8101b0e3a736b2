//! Validate, project and hand a finished draft to the persistence client

use super::client::ApiError;
use super::payload::SubmissionRequest;
use super::traits::PersistenceClientTrait;
use crate::state::{FieldErrors, WizardController, WizardError};

/// Notice shown for failures that are not the endpoint's own answer
pub const GENERIC_FAILURE: &str = "Something went wrong while submitting. Please try again.";

/// What happened to a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; the draft has been discarded
    Submitted(String),
    /// Whole-form validation failed; nothing was sent
    Invalid(FieldErrors),
    /// The endpoint refused the request; the draft is kept
    Rejected(String),
    /// Transport or decode failure; the draft is kept
    Failed(String),
    /// Submit is not possible right now (wrong step, already in flight)
    Blocked(String),
}

pub struct SubmissionPipeline;

impl SubmissionPipeline {
    pub async fn submit<C>(wizard: &mut WizardController, client: &mut C) -> SubmitOutcome
    where
        C: PersistenceClientTrait + ?Sized,
    {
        let kind = wizard.kind();
        let draft_id = wizard.draft_id();
        let draft = match wizard.begin_submit() {
            Ok(draft) => draft.clone(),
            Err(WizardError::Invalid { errors }) => {
                tracing::debug!(form = kind.as_str(), %draft_id, errors = errors.len(), "submit blocked by validation");
                return SubmitOutcome::Invalid(errors);
            }
            Err(e) => return SubmitOutcome::Blocked(e.to_string()),
        };

        let request = match SubmissionRequest::from_draft(kind, &draft) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(form = kind.as_str(), %draft_id, error = %e, "validated draft could not be projected");
                wizard.finish_submit(false);
                return SubmitOutcome::Failed(GENERIC_FAILURE.to_string());
            }
        };

        tracing::info!(form = kind.as_str(), %draft_id, "submitting");
        let result = match &request {
            SubmissionRequest::Registration(r) => client.register_client(r).await,
            SubmissionRequest::Enrollment(r) => client.enroll_client(r).await,
            SubmissionRequest::HealthProgram(r) => client.create_health_program(r).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(form = kind.as_str(), %draft_id, "submitted");
                wizard.finish_submit(true);
                SubmitOutcome::Submitted(kind.success_message().to_string())
            }
            Err(ApiError::Remote {
                status, message, ..
            }) => {
                tracing::warn!(form = kind.as_str(), %draft_id, status, %message, "submission rejected");
                wizard.finish_submit(false);
                SubmitOutcome::Rejected(message)
            }
            Err(e) => {
                tracing::error!(form = kind.as_str(), %draft_id, error = %e, "submission failed");
                wizard.finish_submit(false);
                SubmitOutcome::Failed(GENERIC_FAILURE.to_string())
            }
        }
    }
}

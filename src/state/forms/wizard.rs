//! Step-gated wizard over a form draft

use super::definitions::FormKind;
use super::draft::FormDraft;
use super::field::FieldValue;
use super::schema::{FieldErrors, FormSchema, ValidationResult};
use super::steps::StepDefinition;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStatus {
    #[default]
    Editing,
    /// A submission has been handed to the persistence client
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{} field(s) on this step need attention", .errors.len())]
    StepBlocked { errors: FieldErrors },

    #[error("{} field(s) need attention before submitting", .errors.len())]
    Invalid { errors: FieldErrors },

    #[error("Already on the first step")]
    AtInitialStep,

    #[error("Already on the last step")]
    AtTerminalStep,

    #[error("Submit is only available on the last step")]
    NotOnTerminalStep,

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Holds the draft and current step for one form session
#[derive(Debug, Clone)]
pub struct WizardController {
    kind: FormKind,
    schema: &'static FormSchema,
    draft: FormDraft,
    step: usize,
    errors: FieldErrors,
    status: WizardStatus,
    draft_id: Uuid,
}

impl WizardController {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            schema: kind.schema(),
            draft: FormDraft::new(),
            step: 0,
            errors: FieldErrors::new(),
            status: WizardStatus::Editing,
            draft_id: Uuid::new_v4(),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn draft_id(&self) -> Uuid {
        self.draft_id
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.status == WizardStatus::Submitting
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.schema.steps.len()
    }

    pub fn current_step(&self) -> &'static StepDefinition {
        &self.schema.steps[self.step]
    }

    pub fn is_initial_step(&self) -> bool {
        self.step == 0
    }

    pub fn is_terminal_step(&self) -> bool {
        self.step + 1 >= self.step_count()
    }

    /// Submit is offered on the terminal step while nothing is in flight
    pub fn can_submit(&self) -> bool {
        self.is_terminal_step() && !self.is_submitting()
    }

    /// Store a value (blank clears it) and drop the field's displayed error
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let spec = self
            .schema
            .field(name)
            .ok_or_else(|| WizardError::UnknownField(name.to_string()))?;
        self.draft.set(spec.name, value);
        self.forget_errors_for(spec.name);
        Ok(())
    }

    fn forget_errors_for(&mut self, name: &str) {
        self.errors.remove(name);
        let keys: Vec<_> = self.schema.refinements_on(name).map(|r| r.key()).collect();
        for key in keys {
            self.errors.remove(key);
        }
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.is_submitting() {
            Err(WizardError::SubmissionInFlight)
        } else {
            Ok(())
        }
    }

    /// Check a single field without recording anything
    pub fn check_field(&self, name: &str) -> ValidationResult {
        self.schema.validate_field(name, &self.draft)
    }

    /// Validate the current step, recording its errors for display
    pub fn validate_current_step(&mut self) -> FieldErrors {
        let errors = self.schema.validate_step(self.step, &self.draft);
        self.errors = errors.clone();
        errors
    }

    /// Move forward if every field of the current step is valid
    pub fn advance(&mut self) -> Result<&'static StepDefinition, WizardError> {
        self.ensure_editable()?;
        if self.is_terminal_step() {
            return Err(WizardError::AtTerminalStep);
        }
        let errors = self.validate_current_step();
        if !errors.is_empty() {
            tracing::debug!(
                form = self.kind.as_str(),
                step = self.current_step().name,
                errors = errors.len(),
                "step blocked"
            );
            return Err(WizardError::StepBlocked { errors });
        }
        self.step += 1;
        tracing::debug!(form = self.kind.as_str(), step = self.current_step().name, "advanced");
        Ok(self.current_step())
    }

    /// Move back one step; values are kept as they are
    pub fn retreat(&mut self) -> Result<&'static StepDefinition, WizardError> {
        self.ensure_editable()?;
        if self.is_initial_step() {
            return Err(WizardError::AtInitialStep);
        }
        self.step -= 1;
        self.errors.clear();
        tracing::debug!(form = self.kind.as_str(), step = self.current_step().name, "retreated");
        Ok(self.current_step())
    }

    /// Validate the whole schema and mark the controller as submitting
    pub fn begin_submit(&mut self) -> Result<&FormDraft, WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        if !self.is_terminal_step() {
            return Err(WizardError::NotOnTerminalStep);
        }
        let errors = self.schema.validate_all(&self.draft);
        self.errors = errors.clone();
        if !errors.is_empty() {
            return Err(WizardError::Invalid { errors });
        }
        self.status = WizardStatus::Submitting;
        Ok(&self.draft)
    }

    /// Clear the in-flight mark; a success discards the draft
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.status = WizardStatus::Editing;
        if succeeded {
            self.reset();
        }
    }

    /// Discard the draft and start over on the first step
    pub fn reset(&mut self) {
        self.draft = FormDraft::new();
        self.step = 0;
        self.errors.clear();
        self.status = WizardStatus::Editing;
        self.draft_id = Uuid::new_v4();
    }
}

//! Editing state for the form views

use super::definitions::FormKind;
use super::field::{parse_date, parse_date_range, Activity, FieldValue};
use super::schema::{FieldSpec, InputKind};
use super::steps::StepDefinition;
use super::wizard::{WizardController, WizardError};
use std::collections::HashMap;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Buttons in a form's action row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Next,
    Submit,
    Back,
    Cancel,
}

impl FormAction {
    pub fn label(self) -> &'static str {
        match self {
            FormAction::Next => "Next",
            FormAction::Submit => "Submit",
            FormAction::Back => "Back",
            FormAction::Cancel => "Cancel",
        }
    }
}

/// A wizard plus what the user is typing into it
#[derive(Debug, Clone)]
pub struct FormState {
    wizard: WizardController,
    /// Index into the current step's fields; one past the end is the action row
    pub active_field_index: usize,
    /// Which button is selected when on the action row
    pub selected_button: usize,
    /// Highlighted option of a multi-select field
    pub option_cursor: usize,
    /// Typed text per field: the value itself for text inputs, the pending entry for lists
    inputs: HashMap<&'static str, String>,
    /// Entry that could not be added to a list field
    input_error: Option<(&'static str, String)>,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        Self::from_wizard(WizardController::new(kind))
    }

    pub fn from_wizard(wizard: WizardController) -> Self {
        let mut inputs = HashMap::new();
        for spec in wizard.schema().fields {
            if spec.input_kind().is_text_like() {
                if let Some(value) = wizard.draft().get(spec.name) {
                    inputs.insert(spec.name, value.display_value());
                }
            }
        }
        Self {
            wizard,
            active_field_index: 0,
            selected_button: 0,
            option_cursor: 0,
            inputs,
            input_error: None,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.wizard.kind()
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut WizardController {
        &mut self.wizard
    }

    pub fn current_step(&self) -> &'static StepDefinition {
        self.wizard.current_step()
    }

    /// Field definitions shown on the current step
    pub fn step_fields(&self) -> Vec<&'static FieldSpec> {
        let schema = self.wizard.schema();
        self.current_step()
            .fields
            .iter()
            .filter_map(|name| schema.field(name))
            .collect()
    }

    pub fn active_spec(&self) -> Option<&'static FieldSpec> {
        self.step_fields().get(self.active_field_index).copied()
    }

    pub fn is_action_row_active(&self) -> bool {
        self.active_field_index >= self.step_fields().len()
    }

    /// Typed text for a field
    pub fn input(&self, name: &str) -> &str {
        self.inputs.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn input_error(&self, name: &str) -> Option<&str> {
        self.input_error
            .as_ref()
            .filter(|(field, _)| *field == name)
            .map(|(_, reason)| reason.as_str())
    }

    /// Buttons for the current step
    pub fn actions(&self) -> Vec<FormAction> {
        let primary = if self.wizard.is_terminal_step() {
            FormAction::Submit
        } else {
            FormAction::Next
        };
        let mut actions = vec![primary];
        if !self.wizard.is_initial_step() {
            actions.push(FormAction::Back);
        }
        actions.push(FormAction::Cancel);
        actions
    }

    pub fn selected_action(&self) -> FormAction {
        let actions = self.actions();
        actions
            .get(self.selected_button)
            .copied()
            .unwrap_or(actions[0])
    }

    /// Move to the next button (wraps around)
    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % self.actions().len();
    }

    /// Move to the previous button (wraps around)
    pub fn prev_button(&mut self) {
        let count = self.actions().len();
        self.selected_button = (self.selected_button + count - 1) % count;
    }

    /// Type a character into the active field
    pub fn input_char(&mut self, c: char) -> Result<(), WizardError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        match spec.input_kind() {
            kind if kind.is_text_like() => {
                self.inputs.entry(spec.name).or_default().push(c);
                self.commit_text(spec)
            }
            kind if kind.is_list_like() => {
                self.inputs.entry(spec.name).or_default().push(c);
                Ok(())
            }
            InputKind::Flag | InputKind::Choice | InputKind::Selection if c == ' ' => {
                self.toggle()
            }
            _ => Ok(()),
        }
    }

    /// Delete the last typed character; on an empty list entry, drop the last item
    pub fn backspace(&mut self) -> Result<(), WizardError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        let kind = spec.input_kind();
        if kind.is_text_like() {
            if let Some(buffer) = self.inputs.get_mut(spec.name) {
                buffer.pop();
            }
            return self.commit_text(spec);
        }
        if kind.is_list_like() {
            let buffer = self.inputs.entry(spec.name).or_default();
            if buffer.pop().is_some() {
                return Ok(());
            }
            let value = match self.wizard.draft().get(spec.name) {
                Some(FieldValue::List(items)) => {
                    FieldValue::List(items[..items.len().saturating_sub(1)].to_vec())
                }
                Some(FieldValue::Activities(items)) => {
                    FieldValue::Activities(items[..items.len().saturating_sub(1)].to_vec())
                }
                _ => return Ok(()),
            };
            self.input_error = None;
            return self.wizard.set_field(spec.name, value);
        }
        Ok(())
    }

    /// Add the pending entry of a list field
    pub fn enter(&mut self) -> Result<(), WizardError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        let entry = self.input(spec.name).trim().to_string();
        if entry.is_empty() {
            return Ok(());
        }
        let value = match (spec.input_kind(), self.wizard.draft().get(spec.name)) {
            (InputKind::List, current) => {
                let mut items = current
                    .and_then(FieldValue::as_list)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                items.push(entry);
                FieldValue::List(items)
            }
            (InputKind::Activities, current) => {
                let Some(activity) = Activity::parse(&entry) else {
                    self.input_error = Some((
                        spec.name,
                        "Activities are entered as `name: description`".to_string(),
                    ));
                    return Ok(());
                };
                let mut items = current
                    .and_then(FieldValue::as_activities)
                    .map(<[Activity]>::to_vec)
                    .unwrap_or_default();
                items.push(activity);
                FieldValue::Activities(items)
            }
            _ => return Ok(()),
        };
        self.wizard.set_field(spec.name, value)?;
        self.inputs.remove(spec.name);
        self.input_error = None;
        Ok(())
    }

    /// Space on a flag, choice or multi-select field
    pub fn toggle(&mut self) -> Result<(), WizardError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        match spec.input_kind() {
            InputKind::Flag => {
                let current = self.wizard.draft().flag(spec.name).unwrap_or(false);
                self.wizard.set_field(spec.name, FieldValue::Flag(!current))
            }
            InputKind::Choice => self.cycle(true),
            InputKind::Selection => {
                let options = spec.options();
                let Some((id, _)) = options.get(self.option_cursor) else {
                    return Ok(());
                };
                let mut selected = self
                    .wizard
                    .draft()
                    .list(spec.name)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                if let Some(pos) = selected.iter().position(|s| s == id) {
                    selected.remove(pos);
                } else {
                    selected.push(id.to_string());
                }
                self.wizard.set_field(spec.name, FieldValue::List(selected))
            }
            _ => Ok(()),
        }
    }

    /// Left/right on a choice field cycles its value; on a multi-select it moves the highlight
    pub fn cycle(&mut self, forward: bool) -> Result<(), WizardError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        let options = spec.options();
        if options.is_empty() {
            return Ok(());
        }
        let count = options.len();
        match spec.input_kind() {
            InputKind::Choice => {
                let current = self
                    .wizard
                    .draft()
                    .text(spec.name)
                    .and_then(|v| options.iter().position(|(o, _)| *o == v));
                let next = match (current, forward) {
                    (None, true) => 0,
                    (None, false) => count - 1,
                    (Some(i), true) => (i + 1) % count,
                    (Some(i), false) => (i + count - 1) % count,
                };
                self.wizard
                    .set_field(spec.name, FieldValue::text(options[next].0))
            }
            InputKind::Selection => {
                self.option_cursor = if forward {
                    (self.option_cursor + 1) % count
                } else {
                    (self.option_cursor + count - 1) % count
                };
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn commit_text(&mut self, spec: &'static FieldSpec) -> Result<(), WizardError> {
        let raw = self.input(spec.name).to_string();
        let value = match spec.input_kind() {
            InputKind::Date => parse_date(&raw)
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Text(raw)),
            InputKind::DateRange => parse_date_range(&raw)
                .map(|(start, end)| FieldValue::DateRange { start, end })
                .unwrap_or(FieldValue::Text(raw)),
            _ => FieldValue::Text(raw),
        };
        self.wizard.set_field(spec.name, value)
    }

    /// Go to the next step; when blocked, focus the first failing field
    pub fn next_step(&mut self) -> Result<&'static StepDefinition, WizardError> {
        match self.wizard.advance() {
            Ok(step) => {
                self.focus_first();
                Ok(step)
            }
            Err(WizardError::StepBlocked { errors }) => {
                if let Some(index) = errors.keys().find_map(|key| self.position_of(key)) {
                    self.active_field_index = index;
                }
                Err(WizardError::StepBlocked { errors })
            }
            Err(e) => Err(e),
        }
    }

    pub fn prev_step(&mut self) -> Result<&'static StepDefinition, WizardError> {
        let step = self.wizard.retreat()?;
        self.focus_first();
        Ok(step)
    }

    fn position_of(&self, key: &str) -> Option<usize> {
        let fields = self.current_step().fields;
        fields.iter().position(|f| *f == key).or_else(|| {
            self.wizard
                .schema()
                .refinements
                .iter()
                .find(|r| r.key() == key)
                .and_then(|r| r.fields().first().copied())
                .and_then(|f| fields.iter().position(|name| *name == f))
        })
    }

    fn focus_first(&mut self) {
        self.active_field_index = 0;
        self.selected_button = 0;
        self.option_cursor = 0;
    }

    /// Forget typed text after the wizard discarded its draft
    pub fn reset_inputs(&mut self) {
        self.inputs.clear();
        self.input_error = None;
        self.focus_first();
    }
}

impl Form for FormState {
    fn field_count(&self) -> usize {
        self.step_fields().len() + 1
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
        self.option_cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn focus(form: &mut FormState, name: &str) {
        let index = form
            .step_fields()
            .iter()
            .position(|s| s.name == name)
            .unwrap();
        form.set_active_field(index);
    }

    fn type_str(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.input_char(c).unwrap();
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_field_count_includes_action_row() {
            let form = FormState::new(FormKind::Registration);
            assert_eq!(form.field_count(), 6);
        }

        #[test]
        fn test_next_field_wraps_through_action_row() {
            let mut form = FormState::new(FormKind::Registration);
            for _ in 0..5 {
                form.next_field();
            }
            assert!(form.is_action_row_active());
            form.next_field();
            assert_eq!(form.active_field_index, 0);
        }

        #[test]
        fn test_prev_field_wraps_to_action_row() {
            let mut form = FormState::new(FormKind::HealthProgram);
            form.prev_field();
            assert!(form.is_action_row_active());
        }

        #[test]
        fn test_set_active_field_clamps() {
            let mut form = FormState::new(FormKind::Registration);
            form.set_active_field(100);
            assert_eq!(form.active_field_index, 5);
        }

        #[test]
        fn test_actions_per_step() {
            let mut form = FormState::new(FormKind::Registration);
            assert_eq!(form.actions(), vec![FormAction::Next, FormAction::Cancel]);

            focus(&mut form, "firstName");
            type_str(&mut form, "Ana");
            focus(&mut form, "lastName");
            type_str(&mut form, "Lee");
            focus(&mut form, "dateOfBirth");
            type_str(&mut form, "1990-04-12");
            focus(&mut form, "gender");
            form.toggle().unwrap();
            form.next_step().unwrap();

            assert_eq!(
                form.actions(),
                vec![FormAction::Next, FormAction::Back, FormAction::Cancel]
            );
            assert_eq!(form.active_field_index, 0);
        }

        #[test]
        fn test_button_cycling() {
            let mut form = FormState::new(FormKind::Enrollment);
            assert_eq!(form.selected_action(), FormAction::Submit);
            form.next_button();
            assert_eq!(form.selected_action(), FormAction::Cancel);
            form.next_button();
            assert_eq!(form.selected_action(), FormAction::Submit);
            form.prev_button();
            assert_eq!(form.selected_action(), FormAction::Cancel);
        }

        #[test]
        fn test_blocked_step_focuses_first_error() {
            let mut form = FormState::new(FormKind::Registration);
            focus(&mut form, "firstName");
            type_str(&mut form, "Ana");
            form.set_active_field(5);
            assert!(form.next_step().is_err());
            assert_eq!(form.active_spec().map(|s| s.name), Some("lastName"));
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_typing_commits_text() {
            let mut form = FormState::new(FormKind::Registration);
            type_str(&mut form, "Ana");
            assert_eq!(form.input("firstName"), "Ana");
            assert_eq!(form.wizard().draft().text("firstName"), Some("Ana"));
        }

        #[test]
        fn test_backspace_to_empty_clears_value() {
            let mut form = FormState::new(FormKind::Registration);
            type_str(&mut form, "A");
            form.backspace().unwrap();
            assert!(!form.wizard().draft().contains("firstName"));
        }

        #[test]
        fn test_date_parses_when_complete() {
            let mut form = FormState::new(FormKind::Registration);
            focus(&mut form, "dateOfBirth");
            type_str(&mut form, "1990-04");
            assert_eq!(form.wizard().draft().text("dateOfBirth"), Some("1990-04"));
            type_str(&mut form, "-12");
            assert_eq!(
                form.wizard().draft().date("dateOfBirth"),
                NaiveDate::from_ymd_opt(1990, 4, 12)
            );
        }

        #[test]
        fn test_date_range_input() {
            let mut form = FormState::new(FormKind::Enrollment);
            focus(&mut form, "enrollmentDate");
            type_str(&mut form, "2024-01-01 to 2024-02-01");
            assert_eq!(
                form.wizard().draft().date_range("enrollmentDate"),
                Some((
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
                ))
            );
        }

        #[test]
        fn test_space_toggles_flag() {
            let mut form = FormState::new(FormKind::Enrollment);
            focus(&mut form, "consentGiven");
            form.input_char(' ').unwrap();
            assert_eq!(form.wizard().draft().flag("consentGiven"), Some(true));
            form.input_char(' ').unwrap();
            assert_eq!(form.wizard().draft().flag("consentGiven"), Some(false));
        }

        #[test]
        fn test_choice_cycles_both_ways() {
            let mut form = FormState::new(FormKind::Registration);
            focus(&mut form, "gender");
            form.cycle(true).unwrap();
            assert_eq!(form.wizard().draft().text("gender"), Some("male"));
            form.cycle(true).unwrap();
            assert_eq!(form.wizard().draft().text("gender"), Some("female"));
            form.cycle(false).unwrap();
            form.cycle(false).unwrap();
            assert_eq!(form.wizard().draft().text("gender"), Some("other"));
        }

        #[test]
        fn test_selection_toggles_highlighted_program() {
            let mut form = FormState::new(FormKind::Enrollment);
            focus(&mut form, "programs");
            form.toggle().unwrap();
            form.cycle(true).unwrap();
            form.cycle(true).unwrap();
            form.toggle().unwrap();
            assert_eq!(
                form.wizard().draft().list("programs"),
                Some(&["1".to_string(), "3".to_string()][..])
            );
            form.cycle(false).unwrap();
            form.cycle(false).unwrap();
            form.toggle().unwrap();
            assert_eq!(
                form.wizard().draft().list("programs"),
                Some(&["3".to_string()][..])
            );
        }
    }

    mod lists {
        use super::*;
        use pretty_assertions::assert_eq;

        fn on_step(kind: FormKind, step: usize) -> FormState {
            let mut wizard = WizardController::new(kind);
            for _ in 0..step {
                // Navigation is not under test here; use a controller already past earlier steps
                wizard = skip_step(wizard);
            }
            FormState::from_wizard(wizard)
        }

        fn skip_step(mut wizard: WizardController) -> WizardController {
            let fill: &[(&str, FieldValue)] = &[
                ("title", FieldValue::text("Malaria Nets")),
                ("diseaseType", FieldValue::text("malaria")),
                (
                    "description",
                    FieldValue::text("Distribute treated nets to households"),
                ),
            ];
            for (name, value) in fill {
                if wizard.current_step().owns(name) {
                    wizard.set_field(name, value.clone()).unwrap();
                }
            }
            wizard.advance().unwrap();
            wizard
        }

        #[test]
        fn test_enter_appends_list_item() {
            let mut form = on_step(FormKind::HealthProgram, 1);
            focus(&mut form, "objectives");
            type_str(&mut form, "Distribute nets");
            assert!(form.wizard().draft().list("objectives").is_none());
            form.enter().unwrap();
            assert_eq!(
                form.wizard().draft().list("objectives"),
                Some(&["Distribute nets".to_string()][..])
            );
            assert_eq!(form.input("objectives"), "");
        }

        #[test]
        fn test_backspace_on_empty_entry_removes_last_item() {
            let mut form = on_step(FormKind::HealthProgram, 1);
            focus(&mut form, "objectives");
            type_str(&mut form, "one");
            form.enter().unwrap();
            type_str(&mut form, "two");
            form.enter().unwrap();
            form.backspace().unwrap();
            assert_eq!(
                form.wizard().draft().list("objectives"),
                Some(&["one".to_string()][..])
            );
        }

        #[test]
        fn test_activity_entry_must_have_separator() {
            let mut form = on_step(FormKind::HealthProgram, 1);
            form.wizard_mut()
                .set_field("goal", FieldValue::text("Halve malaria cases"))
                .unwrap();
            form.wizard_mut()
                .set_field("objectives", FieldValue::list(["Nets"]))
                .unwrap();
            form.next_step().unwrap();
            form.wizard_mut()
                .set_field("targetAudience", FieldValue::text("Rural households"))
                .unwrap();
            form.next_step().unwrap();
            assert_eq!(form.current_step().name, "activities");

            type_str(&mut form, "Outreach only");
            form.enter().unwrap();
            assert!(form.input_error("activities").is_some());
            assert!(form.wizard().draft().activities("activities").is_none());

            form.reset_inputs();
            type_str(&mut form, "Outreach: door to door visits");
            form.enter().unwrap();
            assert!(form.input_error("activities").is_none());
            assert_eq!(
                form.wizard().draft().activities("activities"),
                Some(&[Activity::new("Outreach", "door to door visits")][..])
            );
        }
    }
}

//! Declarative field constraints and validation

use super::draft::FormDraft;
use super::field::FieldValue;
use super::steps::StepDefinition;

/// Minimum length for phone-like fields
pub const PHONE_MIN_LEN: usize = 10;

/// Outcome of validating a single field or refinement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationResult::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    #[cfg(test)]
    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(reason),
        }
    }
}

/// Entry of a selection field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub id: &'static str,
    pub label: &'static str,
    /// Secondary text shown after the label
    pub detail: &'static str,
}

/// Constraint attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Free text with a minimum trimmed length
    Text { min_len: usize, required: bool },
    /// Phone number: digits, spaces, `+` and `-`, at least [`PHONE_MIN_LEN`] long
    Phone { required: bool },
    /// Optional email address
    Email,
    /// One of a fixed set of values
    Choice { options: &'static [&'static str] },
    /// Boolean that must be set to true
    MustBeTrue,
    Date,
    DateRange,
    /// Free-form list of strings
    Items { min: usize, max: Option<usize> },
    /// Multi-select over a fixed option table
    Selection {
        options: &'static [SelectOption],
        min: usize,
        max: Option<usize>,
    },
    /// List of `name: description` activities
    Activities { min: usize, max: Option<usize> },
}

/// How a field is edited in the form view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Date,
    DateRange,
    Choice,
    Flag,
    List,
    Activities,
    Selection,
}

impl InputKind {
    /// Typed characters go straight into the value
    pub fn is_text_like(self) -> bool {
        matches!(self, Self::Text | Self::Date | Self::DateRange)
    }

    /// Typed characters are staged and added as a list entry on Enter
    pub fn is_list_like(self) -> bool {
        matches!(self, Self::List | Self::Activities)
    }
}

/// A field definition in a form schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub rule: Rule,
    /// Reason reported when the main constraint fails
    pub message: &'static str,
    /// Help text shown under the field
    pub hint: &'static str,
}

impl FieldSpec {
    pub fn input_kind(&self) -> InputKind {
        match self.rule {
            Rule::Text { .. } | Rule::Phone { .. } | Rule::Email => InputKind::Text,
            Rule::Choice { .. } => InputKind::Choice,
            Rule::MustBeTrue => InputKind::Flag,
            Rule::Date => InputKind::Date,
            Rule::DateRange => InputKind::DateRange,
            Rule::Items { .. } => InputKind::List,
            Rule::Selection { .. } => InputKind::Selection,
            Rule::Activities { .. } => InputKind::Activities,
        }
    }

    pub fn is_required(&self) -> bool {
        match self.rule {
            Rule::Text { required, .. } | Rule::Phone { required } => required,
            Rule::Email => false,
            Rule::Items { min, .. } | Rule::Selection { min, .. } | Rule::Activities { min, .. } => {
                min > 0
            }
            Rule::Choice { .. } | Rule::MustBeTrue | Rule::Date | Rule::DateRange => true,
        }
    }

    /// Options offered by choice and selection fields, as `(value, label)`
    pub fn options(&self) -> Vec<(&'static str, &'static str)> {
        match self.rule {
            Rule::Choice { options } => options.iter().map(|o| (*o, *o)).collect(),
            Rule::Selection { options, .. } => options.iter().map(|o| (o.id, o.label)).collect(),
            _ => Vec::new(),
        }
    }

    /// Secondary text of a selection option
    pub fn option_detail(&self, id: &str) -> Option<&'static str> {
        match self.rule {
            Rule::Selection { options, .. } => {
                options.iter().find(|o| o.id == id).map(|o| o.detail)
            }
            _ => None,
        }
    }

    fn required_message(&self) -> String {
        format!("{} is required", self.label)
    }

    /// Check this field's constraint against its current value
    pub fn check(&self, value: Option<&FieldValue>) -> ValidationResult {
        match self.rule {
            Rule::Text { min_len, required } => match value {
                None if required => ValidationResult::invalid(self.required_message()),
                None => ValidationResult::Valid,
                Some(FieldValue::Text(s)) if s.trim().chars().count() < min_len => {
                    ValidationResult::invalid(self.message)
                }
                Some(FieldValue::Text(_)) => ValidationResult::Valid,
                Some(_) => ValidationResult::invalid(format!("{} must be text", self.label)),
            },
            Rule::Phone { required } => match value {
                None if required => ValidationResult::invalid(self.required_message()),
                None => ValidationResult::Valid,
                Some(FieldValue::Text(s)) => check_phone(s, self),
                Some(_) => ValidationResult::invalid(format!("{} must be text", self.label)),
            },
            Rule::Email => match value {
                None => ValidationResult::Valid,
                Some(FieldValue::Text(s)) if is_email(s) => ValidationResult::Valid,
                Some(_) => ValidationResult::invalid(self.message),
            },
            Rule::Choice { options } => match value {
                None => ValidationResult::invalid(self.required_message()),
                Some(FieldValue::Text(s)) if options.contains(&s.as_str()) => {
                    ValidationResult::Valid
                }
                Some(_) => ValidationResult::invalid(format!(
                    "{} must be one of: {}",
                    self.label,
                    options.join(", ")
                )),
            },
            Rule::MustBeTrue => match value {
                Some(FieldValue::Flag(true)) => ValidationResult::Valid,
                _ => ValidationResult::invalid(self.message),
            },
            Rule::Date => match value {
                None => ValidationResult::invalid(self.message),
                Some(FieldValue::Date(_)) => ValidationResult::Valid,
                Some(_) => {
                    ValidationResult::invalid(format!("{} must be a date (YYYY-MM-DD)", self.label))
                }
            },
            Rule::DateRange => match value {
                None => ValidationResult::invalid(self.message),
                Some(FieldValue::DateRange { .. }) => ValidationResult::Valid,
                Some(_) => ValidationResult::invalid(format!(
                    "{} must be two dates (YYYY-MM-DD to YYYY-MM-DD)",
                    self.label
                )),
            },
            Rule::Items { min, max } => match value {
                None => self.check_count(0, min, max),
                Some(FieldValue::List(items)) => self.check_count(items.len(), min, max),
                Some(_) => ValidationResult::invalid(format!("{} must be a list", self.label)),
            },
            Rule::Selection { options, min, max } => match value {
                None => self.check_count(0, min, max),
                Some(FieldValue::List(ids)) => {
                    if let Some(unknown) = ids
                        .iter()
                        .find(|id| !options.iter().any(|opt| opt.id == id.as_str()))
                    {
                        return ValidationResult::invalid(format!(
                            "Unknown {} option `{}`",
                            self.label.to_lowercase(),
                            unknown
                        ));
                    }
                    self.check_count(ids.len(), min, max)
                }
                Some(_) => ValidationResult::invalid(format!("{} must be a list", self.label)),
            },
            Rule::Activities { min, max } => match value {
                None => self.check_count(0, min, max),
                Some(FieldValue::Activities(items)) => {
                    for activity in items {
                        if activity.name.trim().chars().count() < 3 {
                            return ValidationResult::invalid("Activity name is required");
                        }
                        if activity.description.trim().chars().count() < 10 {
                            return ValidationResult::invalid(
                                "Activity description must be at least 10 characters",
                            );
                        }
                    }
                    self.check_count(items.len(), min, max)
                }
                Some(_) => {
                    ValidationResult::invalid(format!("{} must be a list of activities", self.label))
                }
            },
        }
    }

    fn check_count(&self, len: usize, min: usize, max: Option<usize>) -> ValidationResult {
        if len < min {
            return ValidationResult::invalid(self.message);
        }
        match max {
            Some(max) if len > max => ValidationResult::invalid(format!(
                "{} allows at most {} entries",
                self.label, max
            )),
            _ => ValidationResult::Valid,
        }
    }
}

fn check_phone(value: &str, spec: &FieldSpec) -> ValidationResult {
    let value = value.trim();
    if value.chars().count() < PHONE_MIN_LEN {
        return ValidationResult::invalid(spec.message);
    }
    let allowed = |c: char| c.is_ascii_digit() || c == ' ' || c == '+' || c == '-';
    if !value.chars().all(allowed) {
        return ValidationResult::invalid(format!(
            "{} may only contain digits, spaces, + and -",
            spec.label
        ));
    }
    ValidationResult::Valid
}

/// Loose `local@domain.tld` check
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// A rule spanning several fields, reported under a synthetic key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    /// Two date fields where `start` must not be after `end`
    DateOrder {
        key: &'static str,
        start: &'static str,
        end: &'static str,
        message: &'static str,
    },
    /// A single date-range field whose start must not be after its end
    RangeOrder {
        key: &'static str,
        field: &'static str,
        message: &'static str,
    },
}

impl Refinement {
    /// Synthetic key the result is reported under
    pub fn key(&self) -> &'static str {
        match self {
            Refinement::DateOrder { key, .. } | Refinement::RangeOrder { key, .. } => *key,
        }
    }

    /// Fields the rule reads
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            Refinement::DateOrder { start, end, .. } => vec![*start, *end],
            Refinement::RangeOrder { field, .. } => vec![*field],
        }
    }

    /// Unset or unparsed inputs pass; field rules report those
    pub fn check(&self, draft: &FormDraft) -> ValidationResult {
        let (start, end, message) = match self {
            Refinement::DateOrder {
                start,
                end,
                message,
                ..
            } => match (draft.date(start), draft.date(end)) {
                (Some(s), Some(e)) => (s, e, *message),
                _ => return ValidationResult::Valid,
            },
            Refinement::RangeOrder { field, message, .. } => match draft.date_range(field) {
                Some((s, e)) => (s, e, *message),
                None => return ValidationResult::Valid,
            },
        };
        if start > end {
            ValidationResult::invalid(message)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validation failures keyed by field name or refinement key, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure, replacing any earlier reason for the same key
    pub fn insert(&mut self, key: &'static str, reason: impl Into<String>) {
        let reason = reason.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = reason,
            None => self.0.push((key, reason)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| *k != key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, reason)| reason.as_str())
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn first(&self) -> Option<(&'static str, &str)> {
        self.0.first().map(|(k, r)| (*k, r.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, r)| (*k, r.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Fields, steps and refinements of one form
#[derive(Debug)]
pub struct FormSchema {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    pub steps: &'static [StepDefinition],
    pub refinements: &'static [Refinement],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Index of the step that owns a field
    pub fn step_of(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.owns(name))
    }

    /// Validate one field against the draft
    pub fn validate_field(&self, name: &str, draft: &FormDraft) -> ValidationResult {
        match self.field(name) {
            Some(spec) => spec.check(draft.get(name)),
            None => ValidationResult::invalid(format!("Unknown field `{name}`")),
        }
    }

    /// Refinements whose fields all belong to the given step
    pub fn step_refinements(&self, index: usize) -> impl Iterator<Item = &'static Refinement> + '_ {
        let step = self.steps.get(index);
        self.refinements.iter().filter(move |r| {
            step.is_some_and(|s| r.fields().iter().all(|f| s.owns(f)))
        })
    }

    /// Refinements that involve a field
    pub fn refinements_on(&self, name: &str) -> impl Iterator<Item = &'static Refinement> + '_ {
        let name = name.to_string();
        self.refinements
            .iter()
            .filter(move |r| r.fields().iter().any(|f| *f == name))
    }

    /// Validate the fields and refinements owned by one step
    pub fn validate_step(&self, index: usize, draft: &FormDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let Some(step) = self.steps.get(index) else {
            return errors;
        };
        for name in step.fields {
            if let Some(spec) = self.field(name) {
                if let ValidationResult::Invalid(reason) = spec.check(draft.get(name)) {
                    errors.insert(spec.name, reason);
                }
            }
        }
        for refinement in self.step_refinements(index) {
            if let ValidationResult::Invalid(reason) = refinement.check(draft) {
                errors.insert(refinement.key(), reason);
            }
        }
        errors
    }

    /// Validate every field and refinement in the schema
    pub fn validate_all(&self, draft: &FormDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for spec in self.fields {
            if let ValidationResult::Invalid(reason) = spec.check(draft.get(spec.name)) {
                errors.insert(spec.name, reason);
            }
        }
        for refinement in self.refinements {
            if let ValidationResult::Invalid(reason) = refinement.check(draft) {
                errors.insert(refinement.key(), reason);
            }
        }
        errors
    }

    /// Human label for a field or refinement key
    pub fn label_for(&self, key: &str) -> String {
        if let Some(spec) = self.field(key) {
            return spec.label.to_string();
        }
        self.refinements
            .iter()
            .find(|r| r.key() == key)
            .and_then(|r| r.fields().first().and_then(|f| self.field(f)))
            .map(|spec| spec.label.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

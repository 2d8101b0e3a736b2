//! In-progress form values

use super::field::{Activity, FieldValue};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Field values for one in-progress submission.
///
/// Blank values are never stored: setting a field to an empty string or an
/// empty list removes it, so "unset" and "blank" are the same state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    values: BTreeMap<String, FieldValue>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    #[cfg(test)]
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field value, clearing the field when the value is blank
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if value.is_blank() {
            self.values.remove(&name);
        } else {
            self.values.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_flag)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(FieldValue::as_date)
    }

    pub fn date_range(&self, name: &str) -> Option<(NaiveDate, NaiveDate)> {
        self.get(name).and_then(FieldValue::as_date_range)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    pub fn activities(&self, name: &str) -> Option<&[Activity]> {
        self.get(name).and_then(FieldValue::as_activities)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

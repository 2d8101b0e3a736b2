//! Form field value objects

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format accepted by date inputs and used on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator between the two dates of a range input
pub const RANGE_SEPARATOR: &str = " to ";

/// A program activity, entered as `name: description`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: String,
}

impl Activity {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Parse an activity typed as `name: description`
    pub fn parse(input: &str) -> Option<Self> {
        let (name, description) = input.split_once(':')?;
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() || description.is_empty() {
            return None;
        }
        Some(Self::new(name, description))
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Date(NaiveDate),
    DateRange { start: NaiveDate, end: NaiveDate },
    List(Vec<String>),
    Activities(Vec<Activity>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Create a list value from anything yielding strings
    #[cfg(test)]
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    /// A blank value is equivalent to the field being unset
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Activities(items) => items.is_empty(),
            FieldValue::Flag(_) | FieldValue::Date(_) | FieldValue::DateRange { .. } => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            FieldValue::DateRange { start, end } => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_activities(&self) -> Option<&[Activity]> {
        match self {
            FieldValue::Activities(items) => Some(items),
            _ => None,
        }
    }

    /// Number of entries for list-like values
    pub fn item_count(&self) -> Option<usize> {
        match self {
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Activities(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Flag(true) => "Yes".to_string(),
            FieldValue::Flag(false) => "No".to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            FieldValue::DateRange { start, end } => format!(
                "{}{}{}",
                start.format(DATE_FORMAT),
                RANGE_SEPARATOR,
                end.format(DATE_FORMAT)
            ),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Activities(items) => items
                .iter()
                .map(|a| format!("{}: {}", a.name, a.description))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

/// Parse `YYYY-MM-DD to YYYY-MM-DD` (`..` is accepted as well)
pub fn parse_date_range(input: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = input
        .split_once(RANGE_SEPARATOR)
        .or_else(|| input.split_once(".."))?;
    Some((parse_date(start)?, parse_date(end)?))
}

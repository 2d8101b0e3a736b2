//! Ordered wizard steps

/// A named step and the fields it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub fields: &'static [&'static str],
}

impl StepDefinition {
    pub const fn new(
        name: &'static str,
        title: &'static str,
        fields: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            title,
            fields,
        }
    }

    /// Whether the field is validated by this step
    pub fn owns(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// A step with nothing to fill in, e.g. a review page
    pub fn is_summary(&self) -> bool {
        self.fields.is_empty()
    }
}

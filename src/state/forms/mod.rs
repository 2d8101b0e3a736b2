//! Form domain layer
//!
//! Field values, declarative schemas, step tables and the wizard controller
//! that gates navigation between steps. Nothing here knows about rendering.

mod definitions;
mod draft;
mod field;
mod form_state;
mod schema;
mod steps;
mod wizard;

pub use definitions::FormKind;
pub use draft::FormDraft;
pub use field::{parse_date, Activity, FieldValue, DATE_FORMAT};
pub use form_state::{Form, FormAction, FormState};
pub use schema::{FieldErrors, FieldSpec, InputKind};
pub use wizard::{WizardController, WizardError};

//! Form rendering module
//!
//! - `field_renderer`: one field per input kind, with inline errors
//! - `wizard_form`: step progress, the active step's fields and the action panel

mod field_renderer;
mod wizard_form;

pub use wizard_form::draw as draw_wizard;

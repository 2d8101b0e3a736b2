//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;
mod registry;

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    // Draw main content based on current view
    match app.state.current_view {
        View::Dashboard => dashboard::draw(frame, main_area, app),
        View::Registration | View::Enrollment | View::ProgramCreate => {
            forms::draw_wizard(frame, main_area, app)
        }
        View::Registry => registry::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Error dialog overlays everything
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.error_count() - 1);
    }
}

//! Application state definitions

use super::forms::{FormKind, FormState};
use crate::api::ClientRecord;
use crate::config::DEFAULT_PAGE_SIZE;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Registration,
    Enrollment,
    ProgramCreate,
    Registry,
}

impl View {
    /// Entries of the dashboard menu, in display order
    pub const MENU: [View; 4] = [
        View::Registration,
        View::Enrollment,
        View::ProgramCreate,
        View::Registry,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Registration => "Register Client",
            View::Enrollment => "Enroll Client",
            View::ProgramCreate => "Create Health Program",
            View::Registry => "Client Registry",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            View::Dashboard => "",
            View::Registration => "Record a new client's personal, contact and medical details",
            View::Enrollment => "Enroll a client into up to three health programs",
            View::ProgramCreate => "Define a malaria, TB or HIV program step by step",
            View::Registry => "Search registered clients",
        }
    }

    /// The form shown by this view, if any
    pub fn form_kind(&self) -> Option<FormKind> {
        match self {
            View::Registration => Some(FormKind::Registration),
            View::Enrollment => Some(FormKind::Enrollment),
            View::ProgramCreate => Some(FormKind::HealthProgram),
            View::Dashboard | View::Registry => None,
        }
    }

    pub fn is_form_view(&self) -> bool {
        self.form_kind().is_some()
    }
}

/// Status filter of the client registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
    Pending,
}

impl StatusFilter {
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Inactive => "Inactive",
            StatusFilter::Pending => "Pending",
        }
    }

    /// Next filter in cycle order, wrapping back to `All`
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Inactive,
            StatusFilter::Inactive => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::All,
        }
    }

    pub fn matches(&self, status: Option<&str>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == Some("active"),
            StatusFilter::Inactive => status == Some("inactive"),
            StatusFilter::Pending => status == Some("pending"),
        }
    }
}

/// Main application state
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub selected_index: usize,

    // Active form session
    pub form: Option<FormState>,

    // Registry
    pub clients: Vec<ClientRecord>,
    pub registry_loaded: bool,
    pub registry_filter: String,
    pub registry_page: usize,
    pub page_size: usize,
    pub status_filter: StatusFilter,
    /// Client shown in the details dialog
    pub client_details: Option<ClientRecord>,

    // UI state
    pub api_connected: bool,
    pub status_message: Option<String>,
    errors: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_view: View::default(),
            selected_index: 0,
            form: None,
            clients: Vec::new(),
            registry_loaded: false,
            registry_filter: String::new(),
            registry_page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            status_filter: StatusFilter::default(),
            client_details: None,
            api_connected: false,
            status_message: None,
            errors: VecDeque::new(),
        }
    }
}

impl AppState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error currently shown
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Clients matching the search and status filters
    pub fn filtered_clients(&self) -> Vec<&ClientRecord> {
        self.clients
            .iter()
            .filter(|c| self.status_filter.matches(c.status.as_deref()))
            .filter(|c| c.matches(&self.registry_filter))
            .collect()
    }

    pub fn page_count(&self) -> usize {
        let total = self.filtered_clients().len();
        total.div_ceil(self.page_size.max(1)).max(1)
    }

    /// Rows on the current registry page
    pub fn page_clients(&self) -> Vec<&ClientRecord> {
        let size = self.page_size.max(1);
        self.filtered_clients()
            .into_iter()
            .skip(self.registry_page * size)
            .take(size)
            .collect()
    }

    /// Highlighted row of the current page
    pub fn selected_client(&self) -> Option<&ClientRecord> {
        self.page_clients().get(self.selected_index).copied()
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = self.status_filter.next();
        self.registry_page = 0;
        self.selected_index = 0;
    }

    pub fn next_page(&mut self) {
        if self.registry_page + 1 < self.page_count() {
            self.registry_page += 1;
            self.selected_index = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.registry_page > 0 {
            self.registry_page -= 1;
            self.selected_index = 0;
        }
    }

    /// Filter edits jump back to the first page
    pub fn filter_push(&mut self, c: char) {
        self.registry_filter.push(c);
        self.registry_page = 0;
        self.selected_index = 0;
    }

    pub fn filter_pop(&mut self) {
        self.registry_filter.pop();
        self.registry_page = 0;
        self.selected_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordId;

    fn client(id: i64, first: &str, last: &str) -> ClientRecord {
        ClientRecord {
            id: RecordId::Number(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: None,
            gender: None,
            contact_number: None,
            address: None,
            status: None,
            created_at: None,
        }
    }

    fn with_clients(n: i64) -> AppState {
        AppState {
            clients: (0..n).map(|i| client(i, &format!("Client{i}"), "Doe")).collect(),
            ..Default::default()
        }
    }

    mod view {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_is_dashboard() {
            assert_eq!(View::default(), View::Dashboard);
        }

        #[test]
        fn test_form_views() {
            assert_eq!(View::Enrollment.form_kind(), Some(FormKind::Enrollment));
            assert_eq!(View::ProgramCreate.form_kind(), Some(FormKind::HealthProgram));
            assert!(!View::Registry.is_form_view());
            assert!(!View::Dashboard.is_form_view());
        }
    }

    mod selection {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_move_selection_bounds() {
            let mut state = AppState::default();
            state.move_selection_up();
            assert_eq!(state.selected_index, 0);
            state.move_selection_down(2);
            state.move_selection_down(2);
            assert_eq!(state.selected_index, 1);
        }

        #[test]
        fn test_move_selection_down_empty() {
            let mut state = AppState::default();
            state.move_selection_down(0);
            assert_eq!(state.selected_index, 0);
        }
    }

    mod errors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_errors_are_shown_in_order() {
            let mut state = AppState::default();
            assert!(!state.has_errors());
            state.push_error("first".to_string());
            state.push_error("second".to_string());
            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(!state.has_errors());
        }
    }

    mod registry {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_paging() {
            let mut state = with_clients(12);
            assert_eq!(state.page_count(), 3);
            assert_eq!(state.page_clients().len(), 5);
            state.next_page();
            state.next_page();
            assert_eq!(state.page_clients().len(), 2);
            state.next_page();
            assert_eq!(state.registry_page, 2);
            state.prev_page();
            assert_eq!(state.registry_page, 1);
        }

        #[test]
        fn test_empty_registry_has_one_page() {
            let state = AppState::default();
            assert_eq!(state.page_count(), 1);
            assert!(state.page_clients().is_empty());
        }

        #[test]
        fn test_with_page_size() {
            let state = AppState::with_page_size(3);
            assert_eq!(state.page_size, 3);
            assert_eq!(state.current_view, View::Dashboard);
        }

        #[test]
        fn test_status_filter_cycles_and_filters() {
            let mut state = with_clients(6);
            for (i, client) in state.clients.iter_mut().enumerate() {
                client.status = match i % 3 {
                    0 => Some("active".to_string()),
                    1 => Some("pending".to_string()),
                    _ => None,
                };
            }
            state.next_page();

            state.cycle_status_filter();
            assert_eq!(state.status_filter, StatusFilter::Active);
            assert_eq!(state.registry_page, 0);
            assert_eq!(state.filtered_clients().len(), 2);

            state.cycle_status_filter();
            assert_eq!(state.filtered_clients().len(), 0);
            state.cycle_status_filter();
            assert_eq!(state.filtered_clients().len(), 2);
            state.cycle_status_filter();
            assert_eq!(state.status_filter, StatusFilter::All);
            assert_eq!(state.filtered_clients().len(), 6);
        }

        #[test]
        fn test_selected_client_follows_page() {
            let mut state = with_clients(7);
            state.next_page();
            state.move_selection_down(state.page_clients().len());
            assert_eq!(
                state.selected_client().map(|c| c.full_name()),
                Some("Client6 Doe".to_string())
            );
            state.move_selection_down(state.page_clients().len());
            assert_eq!(state.selected_index, 1);
            assert_eq!(AppState::default().selected_client(), None);
        }

        #[test]
        fn test_filter_resets_page() {
            let mut state = with_clients(12);
            state.next_page();
            state.filter_push('1');
            assert_eq!(state.registry_page, 0);
            let names: Vec<_> = state.filtered_clients().iter().map(|c| c.full_name()).collect();
            assert_eq!(names, vec!["Client1 Doe", "Client10 Doe", "Client11 Doe"]);
            state.filter_pop();
            assert_eq!(state.filtered_clients().len(), 12);
        }
    }
}

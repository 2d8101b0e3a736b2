//! Application state and core logic

use crate::api::{ApiClient, PersistenceClientTrait, SubmissionPipeline, SubmitOutcome};
use crate::config::TuiConfig;
use crate::platform::is_shortcut;
use crate::state::{AppState, Form, FormAction, FormState, InputKind, View, WizardError};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Second Ctrl+C within this window quits
const QUIT_WINDOW: Duration = Duration::from_secs(2);

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Client for the hosted database endpoints
    client: Box<dyn PersistenceClientTrait>,
    /// Whether the app should quit
    quit: bool,
    /// Terminal size (height, width)
    pub terminal_size: Option<(u16, u16)>,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create a new App instance talking to the configured endpoints
    pub async fn new(config: &TuiConfig) -> Result<Self> {
        let client = ApiClient::from_config(config);
        tracing::info!(url = client.base_url(), "using hosted database");
        Self::with_client(Box::new(client), config.registry_page_size()).await
    }

    /// Build the app around any persistence client
    pub async fn with_client(
        client: Box<dyn PersistenceClientTrait>,
        page_size: usize,
    ) -> Result<Self> {
        let mut state = AppState::with_page_size(page_size);
        state.api_connected = client.check_connection().await;
        if !state.api_connected {
            tracing::warn!("hosted database is not reachable");
        }

        Ok(Self {
            state,
            client,
            quit: false,
            terminal_size: None,
            last_ctrl_c: None,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// First Ctrl+C arms, a second one within the window quits
    pub fn handle_ctrl_c(&mut self) {
        let now = Instant::now();
        match self.last_ctrl_c {
            Some(previous) if now.duration_since(previous) <= QUIT_WINDOW => {
                self.quit = true;
            }
            _ => {
                self.last_ctrl_c = Some(now);
                self.state.status_message = Some("Press Ctrl+C again to quit".to_string());
            }
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        self.last_ctrl_c = None;
        self.state.status_message = None;

        match self.state.current_view {
            View::Dashboard => self.handle_dashboard_key(key).await?,
            View::Registry => self.handle_registry_key(key).await?,
            view if view.is_form_view() => self.handle_form_key(key).await?,
            _ => {}
        }

        Ok(())
    }

    /// Switch to a view, starting a fresh form session or loading the registry
    pub async fn open_view(&mut self, view: View) {
        self.state.current_view = view;
        self.state.reset_selection();
        self.state.form = view.form_kind().map(FormState::new);
        if let Some(form) = &self.state.form {
            tracing::debug!(
                form = form.kind().as_str(),
                draft_id = %form.wizard().draft_id(),
                "form opened"
            );
        }
        if view == View::Registry {
            self.state.registry_page = 0;
            self.load_registry().await;
        }
    }

    fn return_to_dashboard(&mut self) {
        let index = View::MENU
            .iter()
            .position(|v| *v == self.state.current_view)
            .unwrap_or(0);
        self.state.current_view = View::Dashboard;
        self.state.selected_index = index;
        self.state.client_details = None;
    }

    async fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.state.move_selection_down(View::MENU.len())
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.state.move_selection_up(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.open_view(View::MENU[index]).await;
            }
            KeyCode::Enter => {
                if let Some(view) = View::MENU.get(self.state.selected_index).copied() {
                    self.open_view(view).await;
                }
            }
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    async fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Esc {
            self.abandon_form();
            return Ok(());
        }
        if is_shortcut(&key, 's') {
            self.submit_form().await;
            return Ok(());
        }
        if is_shortcut(&key, 'n') {
            self.next_step();
            return Ok(());
        }
        if is_shortcut(&key, 'b') {
            self.prev_step();
            return Ok(());
        }

        let Some(form) = self.state.form.as_mut() else {
            return Ok(());
        };

        if form.is_action_row_active() {
            match key.code {
                KeyCode::Tab => form.next_field(),
                KeyCode::BackTab => form.prev_field(),
                KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                    form.next_button()
                }
                KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                    form.prev_button()
                }
                KeyCode::Enter => {
                    let action = form.selected_action();
                    self.run_form_action(action).await;
                }
                _ => {}
            }
            return Ok(());
        }

        let kind = form.active_spec().map(|spec| spec.input_kind());
        let result = match key.code {
            KeyCode::Tab => {
                form.next_field();
                Ok(())
            }
            KeyCode::BackTab => {
                form.prev_field();
                Ok(())
            }
            KeyCode::Enter if kind.is_some_and(InputKind::is_list_like) => form.enter(),
            KeyCode::Enter => {
                form.next_field();
                Ok(())
            }
            KeyCode::Left => form.cycle(false),
            KeyCode::Right => form.cycle(true),
            KeyCode::Up if kind == Some(InputKind::Selection) => form.cycle(false),
            KeyCode::Down if kind == Some(InputKind::Selection) => form.cycle(true),
            KeyCode::Up => {
                form.prev_field();
                Ok(())
            }
            KeyCode::Down => {
                form.next_field();
                Ok(())
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                form.input_char(c)
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.state.status_message = Some(e.to_string());
        }
        Ok(())
    }

    async fn run_form_action(&mut self, action: FormAction) {
        match action {
            FormAction::Next => self.next_step(),
            FormAction::Back => self.prev_step(),
            FormAction::Submit => self.submit_form().await,
            FormAction::Cancel => self.abandon_form(),
        }
    }

    fn next_step(&mut self) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };
        self.state.status_message = match form.next_step() {
            Ok(_) => None,
            Err(WizardError::StepBlocked { errors }) => Some(format!(
                "Fix {} field(s) before continuing",
                errors.len()
            )),
            Err(WizardError::AtTerminalStep) => Some(format!(
                "Last step: press {} to submit",
                crate::platform::SUBMIT_SHORTCUT
            )),
            Err(e) => Some(e.to_string()),
        };
    }

    fn prev_step(&mut self) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };
        if let Err(e) = form.prev_step() {
            self.state.status_message = Some(e.to_string());
        }
    }

    /// Discard the draft and go back to the dashboard
    fn abandon_form(&mut self) {
        if let Some(form) = self.state.form.take() {
            if !form.wizard().draft().is_empty() {
                tracing::debug!(
                    form = form.kind().as_str(),
                    draft_id = %form.wizard().draft_id(),
                    "draft discarded"
                );
                self.state.status_message = Some("Draft discarded".to_string());
            }
        }
        self.return_to_dashboard();
    }

    async fn submit_form(&mut self) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };
        let outcome = SubmissionPipeline::submit(form.wizard_mut(), self.client.as_mut()).await;
        match outcome {
            SubmitOutcome::Submitted(message) => {
                form.reset_inputs();
                self.state.registry_loaded = false;
                self.state.status_message = Some(message);
            }
            SubmitOutcome::Invalid(errors) => {
                let schema = form.wizard().schema();
                let summary = errors
                    .first()
                    .map(|(key, reason)| {
                        let step = schema
                            .step_of(key)
                            .filter(|_| schema.steps.len() > 1)
                            .map(|i| format!(" (step {})", schema.steps[i].title))
                            .unwrap_or_default();
                        format!("{}: {}{}", schema.label_for(key), reason, step)
                    })
                    .unwrap_or_default();
                self.state.status_message = Some(format!(
                    "{} field(s) need attention. {}",
                    errors.len(),
                    summary
                ));
            }
            SubmitOutcome::Rejected(message) | SubmitOutcome::Failed(message) => {
                self.push_error(message);
            }
            SubmitOutcome::Blocked(reason) => {
                self.state.status_message = Some(reason);
            }
        }
    }

    async fn handle_registry_key(&mut self, key: KeyEvent) -> Result<()> {
        // Details dialog is modal
        if self.state.client_details.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.client_details = None;
            }
            return Ok(());
        }
        if is_shortcut(&key, 'r') {
            self.load_registry().await;
            return Ok(());
        }
        match key.code {
            KeyCode::Esc => self.return_to_dashboard(),
            KeyCode::Down => {
                let rows = self.state.page_clients().len();
                self.state.move_selection_down(rows);
            }
            KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => {
                self.state.client_details = self.state.selected_client().cloned();
            }
            KeyCode::Tab => self.state.cycle_status_filter(),
            KeyCode::Right | KeyCode::PageDown => self.state.next_page(),
            KeyCode::Left | KeyCode::PageUp => self.state.prev_page(),
            KeyCode::Backspace => self.state.filter_pop(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.state.filter_push(c)
            }
            _ => {}
        }
        Ok(())
    }

    async fn load_registry(&mut self) {
        match self.client.list_clients().await {
            Ok(clients) => {
                tracing::info!(count = clients.len(), "client registry loaded");
                self.state.clients = clients;
                self.state.registry_loaded = true;
                self.state.api_connected = true;
                if self.state.registry_page >= self.state.page_count() {
                    self.state.registry_page = 0;
                }
            }
            Err(e) => {
                if e.is_remote() {
                    tracing::warn!(error = %e, "client registry request rejected");
                } else {
                    tracing::error!(error = %e, "failed to load client registry");
                }
                self.push_error(format!("Failed to load clients: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ClientRecord, MockPersistenceClientTrait, RecordId};
    use crate::state::{FieldValue, FormKind, StatusFilter};
    use chrono::NaiveDate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn connected_mock() -> MockPersistenceClientTrait {
        let mut mock = MockPersistenceClientTrait::new();
        mock.expect_check_connection().returning(|| true);
        mock
    }

    async fn app_with(mock: MockPersistenceClientTrait) -> App {
        App::with_client(Box::new(mock), 5).await.unwrap()
    }

    fn fill_enrollment(app: &mut App) {
        let wizard = app.state.form.as_mut().unwrap().wizard_mut();
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let values = [
            ("firstName", FieldValue::text("Ana")),
            ("lastName", FieldValue::text("Lee")),
            ("dateOfBirth", FieldValue::Date(ymd(1990, 4, 12))),
            ("gender", FieldValue::text("female")),
            ("programs", FieldValue::list(["1", "3"])),
            (
                "enrollmentDate",
                FieldValue::DateRange {
                    start: ymd(2024, 1, 1),
                    end: ymd(2024, 2, 1),
                },
            ),
            ("consentGiven", FieldValue::Flag(true)),
        ];
        for (name, value) in values {
            wizard.set_field(name, value).unwrap();
        }
    }

    mod dashboard {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_starts_on_dashboard() {
            let app = app_with(connected_mock()).await;
            assert_eq!(app.state.current_view, View::Dashboard);
            assert!(app.state.api_connected);
            assert!(!app.should_quit());
        }

        #[tokio::test]
        async fn test_enter_opens_selected_form() {
            let mut app = app_with(connected_mock()).await;
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.state.current_view, View::Enrollment);
            let form = app.state.form.as_ref().unwrap();
            assert_eq!(form.kind(), FormKind::Enrollment);
        }

        #[tokio::test]
        async fn test_double_ctrl_c_quits() {
            let mut app = app_with(connected_mock()).await;
            app.handle_ctrl_c();
            assert!(!app.should_quit());
            assert!(app.state.status_message.is_some());
            app.handle_ctrl_c();
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn test_other_key_disarms_ctrl_c() {
            let mut app = app_with(connected_mock()).await;
            app.handle_ctrl_c();
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_ctrl_c();
            assert!(!app.should_quit());
        }
    }

    mod forms {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_typing_and_tab_fill_fields() {
            let mut app = app_with(connected_mock()).await;
            app.open_view(View::Registration).await;
            for c in "Ana".chars() {
                app.handle_key(key(KeyCode::Char(c))).await.unwrap();
            }
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            for c in "Lee".chars() {
                app.handle_key(key(KeyCode::Char(c))).await.unwrap();
            }
            let draft = app.state.form.as_ref().unwrap().wizard().draft();
            assert_eq!(draft.text("firstName"), Some("Ana"));
            assert_eq!(draft.text("lastName"), Some("Lee"));
        }

        #[tokio::test]
        async fn test_ctrl_n_blocked_on_invalid_step() {
            let mut app = app_with(connected_mock()).await;
            app.open_view(View::Registration).await;
            app.handle_key(ctrl('n')).await.unwrap();

            let form = app.state.form.as_ref().unwrap();
            assert_eq!(form.current_step().name, "personal");
            assert!(form.wizard().errors().contains("firstName"));
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("Fix 4 field(s) before continuing")
            );
        }

        #[tokio::test]
        async fn test_esc_discards_draft() {
            let mut app = app_with(connected_mock()).await;
            app.open_view(View::ProgramCreate).await;
            app.handle_key(key(KeyCode::Char('M'))).await.unwrap();
            app.handle_key(key(KeyCode::Esc)).await.unwrap();

            assert_eq!(app.state.current_view, View::Dashboard);
            assert!(app.state.form.is_none());
            assert_eq!(app.state.selected_index, 2);
            assert_eq!(app.state.status_message.as_deref(), Some("Draft discarded"));
        }

        #[tokio::test]
        async fn test_submit_success_resets_form() {
            let mut mock = connected_mock();
            mock.expect_enroll_client()
                .withf(|r| r.programs == vec!["1".to_string(), "3".to_string()])
                .times(1)
                .returning(|_| Ok(()));
            let mut app = app_with(mock).await;
            app.open_view(View::Enrollment).await;
            fill_enrollment(&mut app);

            app.handle_key(ctrl('s')).await.unwrap();

            let form = app.state.form.as_ref().unwrap();
            assert!(form.wizard().draft().is_empty());
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("Client enrolled successfully!")
            );
            assert!(!app.state.has_errors());
        }

        #[tokio::test]
        async fn test_submit_rejection_shows_error_dialog() {
            let mut mock = connected_mock();
            mock.expect_enroll_client().times(1).returning(|_| {
                Err(ApiError::Remote {
                    status: 500,
                    message: "Failed to enroll client.".to_string(),
                    errors: None,
                })
            });
            let mut app = app_with(mock).await;
            app.open_view(View::Enrollment).await;
            fill_enrollment(&mut app);

            app.handle_key(ctrl('s')).await.unwrap();

            assert_eq!(app.state.current_error(), Some("Failed to enroll client."));
            assert!(!app.state.form.as_ref().unwrap().wizard().draft().is_empty());

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(!app.state.has_errors());
            assert_eq!(app.state.current_view, View::Enrollment);
        }

        #[tokio::test]
        async fn test_submit_invalid_summarizes_first_error() {
            let mut mock = connected_mock();
            mock.expect_enroll_client().never();
            let mut app = app_with(mock).await;
            app.open_view(View::Enrollment).await;
            fill_enrollment(&mut app);
            app.state
                .form
                .as_mut()
                .unwrap()
                .wizard_mut()
                .set_field("consentGiven", FieldValue::Flag(false))
                .unwrap();

            app.handle_key(ctrl('s')).await.unwrap();

            assert_eq!(
                app.state.status_message.as_deref(),
                Some("1 field(s) need attention. Consent Given: You must obtain client consent")
            );
        }

        #[tokio::test]
        async fn test_action_row_cancel() {
            let mut app = app_with(connected_mock()).await;
            app.open_view(View::Enrollment).await;
            app.handle_key(key(KeyCode::BackTab)).await.unwrap();
            assert!(app.state.form.as_ref().unwrap().is_action_row_active());
            app.handle_key(key(KeyCode::Right)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.state.current_view, View::Dashboard);
        }
    }

    mod registry {
        use super::*;
        use pretty_assertions::assert_eq;

        fn record(id: i64, first: &str, last: &str) -> ClientRecord {
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

        fn with_status(mut record: ClientRecord, status: &str) -> ClientRecord {
            record.status = Some(status.to_string());
            record
        }

        async fn registry_app() -> App {
            let mut mock = connected_mock();
            mock.expect_list_clients().times(1).returning(|| {
                Ok(vec![
                    with_status(record(1, "Ana", "Lee"), "active"),
                    with_status(record(2, "Bo", "Kim"), "pending"),
                    record(3, "Cy", "Oda"),
                ])
            });
            let mut app = app_with(mock).await;
            app.open_view(View::Registry).await;
            app
        }

        #[tokio::test]
        async fn test_opening_registry_loads_clients() {
            let mut mock = connected_mock();
            mock.expect_list_clients()
                .times(1)
                .returning(|| Ok(vec![record(1, "Ana", "Lee"), record(2, "Bo", "Kim")]));
            let mut app = app_with(mock).await;
            app.open_view(View::Registry).await;

            assert!(app.state.registry_loaded);
            assert_eq!(app.state.clients.len(), 2);

            app.handle_key(key(KeyCode::Char('b'))).await.unwrap();
            let names: Vec<_> = app
                .state
                .filtered_clients()
                .iter()
                .map(|c| c.full_name())
                .collect();
            assert_eq!(names, vec!["Bo Kim"]);
        }

        #[tokio::test]
        async fn test_load_failure_is_reported() {
            let mut mock = connected_mock();
            mock.expect_list_clients().times(1).returning(|| {
                Err(ApiError::Remote {
                    status: 500,
                    message: "Failed to fetch clients.".to_string(),
                    errors: None,
                })
            });
            let mut app = app_with(mock).await;
            app.open_view(View::Registry).await;

            assert_eq!(
                app.state.current_error(),
                Some("Failed to load clients: Failed to fetch clients.")
            );
        }

        #[tokio::test]
        async fn test_tab_cycles_status_filter() {
            let mut app = registry_app().await;
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            assert_eq!(app.state.status_filter, StatusFilter::Active);
            let names: Vec<_> = app
                .state
                .filtered_clients()
                .iter()
                .map(|c| c.full_name())
                .collect();
            assert_eq!(names, vec!["Ana Lee"]);

            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            assert_eq!(app.state.status_filter, StatusFilter::Pending);
            assert_eq!(app.state.filtered_clients().len(), 1);
        }

        #[tokio::test]
        async fn test_enter_opens_details_of_selected_row() {
            let mut app = registry_app().await;
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            let details = app.state.client_details.as_ref().unwrap();
            assert_eq!(details.full_name(), "Bo Kim");
            assert_eq!(details.status_label(), "Pending");

            // Keys other than Enter/Esc are swallowed by the dialog
            app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
            assert!(app.state.registry_filter.is_empty());

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(app.state.client_details.is_none());
            assert_eq!(app.state.current_view, View::Registry);
        }

        #[tokio::test]
        async fn test_enter_on_empty_page_opens_nothing() {
            let mut app = registry_app().await;
            for c in "nobody".chars() {
                app.handle_key(key(KeyCode::Char(c))).await.unwrap();
            }
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(app.state.client_details.is_none());
        }

        #[tokio::test]
        async fn test_ctrl_r_refreshes() {
            let mut mock = connected_mock();
            mock.expect_list_clients().times(2).returning(|| Ok(vec![]));
            let mut app = app_with(mock).await;
            app.open_view(View::Registry).await;
            app.handle_key(ctrl('r')).await.unwrap();
            assert!(app.state.registry_filter.is_empty());
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Frame, Terminal};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error};

use crate::config::IntakeConfig;
use crate::lifecycle::{
    FormState, Notification, Persistence, RecentListState, Refresh, RemoteError, RequestBackend,
};
use crate::model::{RecentRequestEntry, ServiceRequest};
use crate::storage::{RequestStore, StorageError};

use super::action::Action;
use super::error::AppError;
use super::router::Router;
use super::screens::{
    HelpState, RecordLoad, RecordScreen, RequestFormScreen, draw_help, draw_record,
    draw_request_form,
};

/// How long the loop waits for a key before checking background tasks.
const TICK: Duration = Duration::from_millis(50);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Enter a new service request and browse recent ones.
    RequestForm,
    /// View one record opened through the router.
    Record,
    /// Show keybinding help.
    Help,
}

type RecordLookup = (String, JoinHandle<Result<Option<ServiceRequest>, StorageError>>);

/// Top-level application state.
pub struct App {
    screen: Screen,
    config: IntakeConfig,
    store: Arc<RequestStore>,
    form: FormState,
    recent: RecentListState,
    router: Router,
    form_screen: RequestFormScreen,
    record_screen: RecordScreen,
    help: HelpState,
    notice: Option<Notification>,
    pending_submit: Option<JoinHandle<Result<String, RemoteError>>>,
    pending_refresh: Option<JoinHandle<Result<Vec<RecentRequestEntry>, RemoteError>>>,
    pending_record: Option<RecordLookup>,
    refresh_again: bool,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` on the [`Screen::RequestForm`] screen.
    pub fn new(store: RequestStore, config: IntakeConfig) -> Self {
        Self {
            screen: Screen::RequestForm,
            form: FormState::with_record_type(config.record_type.clone()),
            config,
            store: Arc::new(store),
            recent: RecentListState::new(),
            router: Router::new(),
            form_screen: RequestFormScreen::new(),
            record_screen: RecordScreen::new(),
            help: HelpState::new(),
            notice: None,
            pending_submit: None,
            pending_refresh: None,
            pending_record: None,
            refresh_again: false,
            should_quit: false,
        }
    }

    /// Main event loop: draw → apply finished tasks → read event → dispatch.
    ///
    /// Must run inside a tokio runtime; keys are polled with a short timeout
    /// so spawned backend calls make progress between events.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        self.refresh_recent();
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.poll_tasks().await;
            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Renders the current screen.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::RequestForm => draw_request_form(
                &self.form_screen,
                &self.form,
                &self.recent,
                self.notice.as_ref(),
                frame,
                area,
            ),
            Screen::Record => draw_record(&self.record_screen, frame, area),
            Screen::Help => draw_help(&self.help, frame, area),
        }
    }

    /// Handles a key event: notice dismissal first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.notice.as_ref().map(|n| n.persistence) {
            Some(Persistence::Sticky) if key.code == KeyCode::Esc => {
                self.notice = None;
                return;
            }
            Some(Persistence::Dismissable) => self.notice = None,
            Some(Persistence::Sticky) | None => {}
        }

        let action = match self.screen {
            Screen::RequestForm => self.form_screen.handle_key(key, &mut self.form, &self.recent),
            Screen::Record => self.record_screen.handle_key(key),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(Screen::Help) => {
                self.help.set_origin(self.screen);
                self.help.reset();
                self.screen = Screen::Help;
            }
            Action::Navigate(screen) => self.screen = screen,
            Action::Submit => self.start_submit(),
            Action::RefreshRecent => self.refresh_recent(),
            Action::ViewCreatedRecord => {
                self.form.view_created_record(&mut self.router);
                self.open_pending_route();
            }
            Action::ViewRecord(record_id) => {
                self.form.view_record(&record_id, &mut self.router);
                self.open_pending_route();
            }
            Action::Quit => self.should_quit = true,
        }
    }

    /// Validates, snapshots the inputs, and sends them on a background task.
    fn start_submit(&mut self) {
        match self.form.begin_submit() {
            Ok(draft) => {
                let store = Arc::clone(&self.store);
                self.pending_submit =
                    Some(tokio::spawn(async move { store.create_request(draft).await }));
            }
            Err(err) => {
                debug!(%err, "submit not dispatched");
                if let Some(notice) = err.notification() {
                    self.notice = Some(notice);
                }
            }
        }
    }

    /// Starts a recent-list fetch. If one is already running, another starts
    /// once it finishes.
    fn refresh_recent(&mut self) {
        if self.pending_refresh.is_some() {
            self.refresh_again = true;
            return;
        }
        let store = Arc::clone(&self.store);
        let limit = self.config.recent_limit;
        self.pending_refresh = Some(tokio::spawn(async move { store.list_recent(limit).await }));
    }

    /// Switches to the record screen for a route the form just requested.
    fn open_pending_route(&mut self) {
        let Some(route) = self.router.take_pending() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let record_id = route.record_id.clone();
        let lookup_id = record_id.clone();
        let handle = tokio::spawn(async move { store.get_request(&lookup_id).await });
        self.record_screen.open(route);
        self.pending_record = Some((record_id, handle));
        self.screen = Screen::Record;
    }

    /// Applies the results of any background tasks that have finished.
    pub async fn poll_tasks(&mut self) {
        if let Some(result) = take_finished(&mut self.pending_submit).await {
            self.finish_submit(result);
        }
        if let Some(result) = take_finished(&mut self.pending_refresh).await {
            self.finish_refresh(result);
        }
        if self
            .pending_record
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_finished())
        {
            if let Some((record_id, handle)) = self.pending_record.take() {
                self.finish_record(&record_id, handle.await);
            }
        }
    }

    /// Waits for every background task, including ones started while waiting.
    pub async fn settle(&mut self) {
        loop {
            if let Some(handle) = self.pending_submit.take() {
                self.finish_submit(handle.await);
            } else if let Some(handle) = self.pending_refresh.take() {
                self.finish_refresh(handle.await);
            } else if let Some((record_id, handle)) = self.pending_record.take() {
                self.finish_record(&record_id, handle.await);
            } else {
                break;
            }
        }
    }

    fn finish_submit(&mut self, result: Result<Result<String, RemoteError>, JoinError>) {
        let result = result.unwrap_or_else(|e| {
            error!(%e, "submit task did not complete");
            Err(RemoteError::generic(format!("request task failed: {e}")))
        });
        let created = result.is_ok();
        if let Some(notice) = self.form.complete_submit(result) {
            self.notice = Some(notice);
        }
        if created && self.config.refresh_after_create {
            self.refresh_recent();
        }
    }

    fn finish_refresh(
        &mut self,
        result: Result<Result<Vec<RecentRequestEntry>, RemoteError>, JoinError>,
    ) {
        let result = result.unwrap_or_else(|e| {
            error!(%e, "refresh task did not complete");
            Err(RemoteError::generic(format!("refresh task failed: {e}")))
        });
        self.recent.on_refresh(Refresh::from(result));
        self.form_screen.clamp_selection(self.recent.entries().len());
        if std::mem::take(&mut self.refresh_again) {
            self.refresh_recent();
        }
    }

    fn finish_record(
        &mut self,
        record_id: &str,
        result: Result<Result<Option<ServiceRequest>, StorageError>, JoinError>,
    ) {
        let load = match result {
            Ok(Ok(Some(record))) => RecordLoad::Loaded(record),
            Ok(Ok(None)) => RecordLoad::Missing,
            Ok(Err(e)) => RecordLoad::Failed(e.to_string()),
            Err(e) => RecordLoad::Failed(format!("record lookup failed: {e}")),
        };
        self.record_screen.set_load(record_id, load);
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn recent(&self) -> &RecentListState {
        &self.recent
    }

    pub fn record_screen(&self) -> &RecordScreen {
        &self.record_screen
    }

    /// The notification currently on display, if any.
    pub fn notice(&self) -> Option<&Notification> {
        self.notice.as_ref()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn help(&self) -> &HelpState {
        &self.help
    }
}

/// Takes and awaits a task only if it has already finished.
async fn take_finished<T>(slot: &mut Option<JoinHandle<T>>) -> Option<Result<T, JoinError>> {
    if slot.as_ref().is_some_and(JoinHandle::is_finished) {
        let handle = slot.take()?;
        Some(handle.await)
    } else {
        None
    }
}

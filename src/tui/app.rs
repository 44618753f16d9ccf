//! TUI application - session state machine and event loop.
//!
//! This module contains:
//! - Terminal setup and restoration
//! - The shell state machine (Loading -> Unauthenticated/Authenticated)
//! - The event loop for keyboard input and in-flight API requests
//! - The blocking error alert overlay

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cli::Cli;
use crate::session::SessionStore;
use crate::{Error, Result};

use super::views::{
    AuthMode, AuthOutcome, AuthRequest, AuthView, EditorOutcome, EditorView, NotesAction,
    NotesView, SaveRequest, SaveTarget,
};

/// Session state of the shell.
///
/// `Loading` exists only until the session store has been read once;
/// after that the shell is in exactly one of the two flows. There is no
/// automatic re-validation of a stored token: a stale token stays
/// `Authenticated` until a request fails, and even then the failure is
/// surfaced as an alert rather than a forced logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Loading,
    Unauthenticated,
    Authenticated,
}

impl ShellState {
    /// Map the result of the startup token read to a flow.
    pub fn from_stored_token(token: Option<&str>) -> Self {
        match token {
            Some(_) => ShellState::Authenticated,
            None => ShellState::Unauthenticated,
        }
    }
}

/// A request the event loop should issue against the API.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Authenticate(AuthRequest),
    LoadNotes,
    Save(SaveRequest),
    Delete(String),
    Logout,
}

/// Application state owned by the event loop.
pub struct App {
    state: ShellState,
    store: SessionStore,
    api: ApiClient,
    auth: AuthView,
    notes: NotesView,
    editor: EditorView,
    /// Blocking user-facing error message; any key dismisses it
    alert: Option<String>,
    /// Disables save/delete triggers while a request is in flight
    busy: bool,
    should_quit: bool,
}

impl App {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self {
            state: ShellState::Loading,
            store,
            api,
            auth: AuthView::new(),
            notes: NotesView::new(),
            editor: EditorView::new(),
            alert: None,
            busy: false,
            should_quit: false,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Resolve `Loading` by reading the session store once.
    pub fn initialize(&mut self) {
        let token = self.store.load();
        if let Some(token) = &token {
            self.api.set_token(token);
        }
        self.state = ShellState::from_stored_token(token.as_deref());
        info!(state = ?self.state, "session resolved");
    }

    /// True when the notes flow still needs its initial fetch.
    fn needs_initial_load(&self) -> bool {
        self.state == ShellState::Authenticated && self.notes.is_loading() && !self.busy
    }

    /// Route a keypress to the active screen.
    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // The alert is blocking: any key dismisses it, nothing else fires
        if self.alert.take().is_some() {
            return None;
        }

        match self.state {
            ShellState::Loading => None,
            ShellState::Unauthenticated => match self.auth.handle_key(key)? {
                AuthOutcome::Submit(request) => {
                    if self.busy {
                        return None;
                    }
                    Some(Action::Authenticate(request))
                }
                AuthOutcome::Quit => {
                    self.should_quit = true;
                    None
                }
            },
            ShellState::Authenticated => {
                if self.editor.is_open() {
                    match self.editor.handle_key(key)? {
                        EditorOutcome::Save(request) => {
                            if self.busy {
                                return None;
                            }
                            Some(Action::Save(request))
                        }
                        EditorOutcome::Invalid(message) => {
                            self.alert = Some(message);
                            None
                        }
                        EditorOutcome::Cancel => {
                            self.editor.close();
                            None
                        }
                    }
                } else {
                    match self.notes.handle_key(key, self.busy)? {
                        NotesAction::OpenCreate => {
                            self.editor.open_create();
                            None
                        }
                        NotesAction::OpenEdit(note) => {
                            self.editor.open_edit(&note);
                            None
                        }
                        NotesAction::Delete(note) => Some(Action::Delete(note.id)),
                        NotesAction::Refresh => Some(Action::LoadNotes),
                        NotesAction::Logout => Some(Action::Logout),
                        NotesAction::Quit => {
                            self.should_quit = true;
                            None
                        }
                    }
                }
            }
        }
    }

    /// Execute an action against the API and fold the result back into
    /// view state. On failure the views are left exactly as they were,
    /// so the user can retry manually.
    async fn perform(&mut self, action: Action) {
        let was_load = action == Action::LoadNotes;
        self.busy = true;
        let result = self.dispatch(action).await;
        self.busy = false;

        if let Err(e) = result {
            warn!(error = %e, "request failed");
            // A failed fetch still counts as the one initial load;
            // nothing is retried automatically
            if was_load {
                self.notes.finish_loading();
            }
            self.alert = Some(e.to_string());
        }
    }

    async fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Authenticate(request) => {
                let token = match request.mode {
                    AuthMode::SignIn => {
                        self.api.login(&request.email, &request.password).await?
                    }
                    AuthMode::SignUp => {
                        self.api
                            .register(&request.email, &request.password, &request.name)
                            .await?
                    }
                };
                // Persist before transitioning so a restart lands in the
                // same flow
                self.store.save(&token)?;
                self.api.set_token(&token);
                self.auth.reset();
                self.notes = NotesView::new();
                self.state = ShellState::Authenticated;
                info!("authenticated");
                Ok(())
            }
            Action::LoadNotes => {
                let notes = self.api.list_notes().await?;
                self.notes.set_notes(notes);
                Ok(())
            }
            Action::Save(request) => {
                match &request.target {
                    SaveTarget::Create => {
                        let note = self
                            .api
                            .create_note(&request.title, &request.content)
                            .await?;
                        self.notes.apply_created(note);
                    }
                    SaveTarget::Update { id } => {
                        self.api
                            .update_note(id, &request.title, &request.content)
                            .await?;
                        self.notes
                            .apply_updated(id, &request.title, &request.content);
                    }
                }
                // Close only after the request succeeded; a failure
                // leaves the modal open for a retry
                self.editor.close();
                Ok(())
            }
            Action::Delete(id) => {
                self.api.delete_note(&id).await?;
                self.notes.apply_deleted(&id);
                Ok(())
            }
            Action::Logout => {
                self.store.clear()?;
                self.api.clear_token();
                self.editor.close();
                self.notes = NotesView::new();
                self.auth.reset();
                self.state = ShellState::Unauthenticated;
                info!("logged out");
                Ok(())
            }
        }
    }

    /// Render the UI.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(5),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        self.render_title_bar(frame, chunks[0]);

        match self.state {
            ShellState::Loading => {
                let loading = Paragraph::new("Loading...")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center);
                frame.render_widget(loading, chunks[1]);
            }
            ShellState::Unauthenticated => self.auth.render(frame, chunks[1]),
            ShellState::Authenticated => {
                self.notes.render(frame, chunks[1]);
                if self.editor.is_open() {
                    let modal = modal_rect(chunks[1]);
                    self.editor.render(frame, modal, self.busy);
                }
            }
        }

        self.render_status_bar(frame, chunks[2]);

        if let Some(message) = self.alert.clone() {
            render_alert(frame, area, &message);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let busy = if self.busy { " ..." } else { "" };
        let title = Paragraph::new(format!(" jot{}", busy))
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(title, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.state {
            ShellState::Loading => "",
            ShellState::Unauthenticated => {
                " Enter:Submit  Tab:Next field  Ctrl+R:Switch mode  Esc:Quit"
            }
            ShellState::Authenticated if self.editor.is_open() => {
                " Ctrl+S:Save  Tab:Switch field  Esc:Cancel"
            }
            ShellState::Authenticated => {
                " a:New  Enter:Edit  d:Delete  j/k:Navigate  r:Refresh  l:Logout  q:Quit"
            }
        };
        let status = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(status, area);
    }
}

/// Rect for the editor modal: centered, most of the content area.
fn modal_rect(area: Rect) -> Rect {
    let margin_x = area.width / 10;
    let margin_y = area.height / 10;
    Rect {
        x: area.x + margin_x,
        y: area.y + margin_y,
        width: area.width - margin_x * 2,
        height: area.height - margin_y * 2,
    }
}

/// Render the blocking error alert over everything else.
fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let width = area.width.clamp(20, 60).min(area.width);
    let height = 6u16.min(area.height);
    let dialog = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, dialog);
    let text = format!("{}\n\nPress any key to continue", message);
    let alert = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        );
    frame.render_widget(alert, dialog);
}

/// Setup the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the application.
///
/// Requests are awaited inline by the loop: a triggered action suspends
/// input handling until its response arrives, and the busy flag keeps
/// the triggering controls disabled in the meantime. In-flight requests
/// are never cancelled.
pub async fn run(cli: Cli) -> Result<()> {
    let store = match &cli.data_dir {
        Some(dir) => SessionStore::with_dir(dir.clone()),
        None => SessionStore::new(),
    };

    let mut app = App::new(ApiClient::new(cli.api_base.clone()), store);
    app.initialize();

    let mut terminal = setup_terminal()?;

    let run_result = async {
        loop {
            if app.needs_initial_load() {
                app.perform(Action::LoadNotes).await;
            }

            terminal.draw(|f| app.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = app.handle_key(key) {
                            app.perform(action).await;
                        }
                    }
                }
            }

            if app.should_quit() {
                return Ok::<(), Error>(());
            }
        }
    }
    .await;

    restore_terminal()?;
    run_result
}

//! Auth view - sign-in / sign-up form.
//!
//! One form shared between the two modes: email and password, plus a
//! name field when signing up. There is no client-side validation here;
//! empty fields are submitted as-is and server-side errors come back
//! through the shell's alert.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Which flavor of the form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Focusable fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthField {
    Email,
    Name,
    Password,
}

/// Credentials handed to the shell on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// What a keypress did to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Submit the form with the current field values
    Submit(AuthRequest),
    /// Leave the application
    Quit,
}

/// State for the auth screen.
pub struct AuthView {
    mode: AuthMode,
    email: String,
    password: String,
    name: String,
    focus: AuthField,
}

impl AuthView {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::SignIn,
            email: String::new(),
            password: String::new(),
            name: String::new(),
            focus: AuthField::Email,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Reset all transient form state (on flow transitions).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Switch between sign-in and sign-up. Field values are kept so a
    /// typo in the mode choice doesn't cost the user their input.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        // The name field only exists in sign-up
        if self.mode == AuthMode::SignIn && self.focus == AuthField::Name {
            self.focus = AuthField::Password;
        }
    }

    fn next_field(&mut self) {
        self.focus = match (self.focus, self.mode) {
            (AuthField::Email, AuthMode::SignUp) => AuthField::Name,
            (AuthField::Email, AuthMode::SignIn) => AuthField::Password,
            (AuthField::Name, _) => AuthField::Password,
            (AuthField::Password, _) => AuthField::Email,
        };
    }

    fn previous_field(&mut self) {
        self.focus = match (self.focus, self.mode) {
            (AuthField::Email, _) => AuthField::Password,
            (AuthField::Name, _) => AuthField::Email,
            (AuthField::Password, AuthMode::SignUp) => AuthField::Name,
            (AuthField::Password, AuthMode::SignIn) => AuthField::Email,
        };
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Name => &mut self.name,
            AuthField::Password => &mut self.password,
        }
    }

    fn request(&self) -> AuthRequest {
        AuthRequest {
            mode: self.mode,
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
        }
    }

    /// Handle a keypress, possibly producing an outcome for the shell.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AuthOutcome> {
        match key.code {
            KeyCode::Esc => return Some(AuthOutcome::Quit),
            KeyCode::Enter => return Some(AuthOutcome::Submit(self.request())),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Backspace => {
                self.focused_value_mut().pop();
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.toggle_mode();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focused_value_mut().push(c);
            }
            _ => {}
        }
        None
    }

    /// Render the form centered in the given area.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.mode {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Sign Up",
        };

        let field_count: u16 = match self.mode {
            AuthMode::SignIn => 2,
            AuthMode::SignUp => 3,
        };

        let form_height = field_count * 3 + 3;
        let form_width = area.width.clamp(20, 60);
        let form = centered_rect(area, form_width, form_height);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title));
        let inner = block.inner(form);
        frame.render_widget(block, form);

        let mut constraints = vec![Constraint::Length(3); field_count as usize];
        constraints.push(Constraint::Length(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let mut row = 0;
        self.render_field(frame, rows[row], "Email", &self.email, AuthField::Email);
        row += 1;
        if self.mode == AuthMode::SignUp {
            self.render_field(frame, rows[row], "Name", &self.name, AuthField::Name);
            row += 1;
        }
        let masked = "*".repeat(self.password.chars().count());
        self.render_field(frame, rows[row], "Password", &masked, AuthField::Password);
        row += 1;

        let hint = match self.mode {
            AuthMode::SignIn => "Don't have an account? Ctrl+R to sign up",
            AuthMode::SignUp => "Already have an account? Ctrl+R to sign in",
        };
        frame.render_widget(
            Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            rows[row],
        );
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, label: &str, value: &str, field: AuthField) {
        let focused = self.focus == field;
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cursor = if focused { "_" } else { "" };
        let input = Paragraph::new(format!("{}{}", value, cursor)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(format!(" {} ", label)),
        );
        frame.render_widget(input, area);
    }
}

impl Default for AuthView {
    fn default() -> Self {
        Self::new()
    }
}

/// Center a fixed-size rect inside `area`, clamped to its bounds.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

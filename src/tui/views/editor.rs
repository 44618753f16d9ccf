//! Note editor modal.
//!
//! One modal for both create and edit: opening for an existing note
//! pre-fills the inputs, opening for creation starts them empty. Save is
//! gated on both title and content being non-blank; a violation never
//! reaches the network. The modal stays open on a failed save so the
//! user can retry.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::models::Note;
use crate::{Error, Result};

/// Maximum title length, matching the service's input cap.
const MAX_TITLE_LEN: usize = 100;

/// Which input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorField {
    Title,
    Content,
}

/// What the save applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveTarget {
    /// New note, prepended to the list on success
    Create,
    /// Existing note, replaced in place on success
    Update { id: String },
}

/// A validated save, ready for the network.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub target: SaveTarget,
    pub title: String,
    pub content: String,
}

/// What a keypress did to the modal.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome {
    /// Validation passed; the shell should issue the request
    Save(SaveRequest),
    /// Validation failed with a user-facing message; nothing was sent
    Invalid(String),
    /// Modal dismissed without saving
    Cancel,
}

/// State for the note editor modal.
pub struct EditorView {
    open: bool,
    /// The note being edited, or None when creating
    editing: Option<Note>,
    title: String,
    content: String,
    focus: EditorField,
}

impl EditorView {
    pub fn new() -> Self {
        Self {
            open: false,
            editing: None,
            title: String::new(),
            content: String::new(),
            focus: EditorField::Title,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open for a new note with empty inputs.
    pub fn open_create(&mut self) {
        self.open = true;
        self.editing = None;
        self.title.clear();
        self.content.clear();
        self.focus = EditorField::Title;
    }

    /// Open for an existing note, pre-filling the inputs.
    pub fn open_edit(&mut self, note: &Note) {
        self.open = true;
        self.editing = Some(note.clone());
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.focus = EditorField::Title;
    }

    /// Close and reset all transient state.
    pub fn close(&mut self) {
        *self = Self::new();
    }

    /// Validate the inputs and build the save request.
    ///
    /// Both title and content must be non-blank after trimming; the
    /// untrimmed values are what gets sent, matching what the user typed.
    pub fn save_request(&self) -> Result<SaveRequest> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(Error::Validation(
                "Please fill in both title and content".to_string(),
            ));
        }
        let target = match &self.editing {
            Some(note) => SaveTarget::Update {
                id: note.id.clone(),
            },
            None => SaveTarget::Create,
        };
        Ok(SaveRequest {
            target,
            title: self.title.clone(),
            content: self.content.clone(),
        })
    }

    /// Handle a keypress while the modal is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<EditorOutcome> {
        match key.code {
            KeyCode::Esc => return Some(EditorOutcome::Cancel),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(match self.save_request() {
                    Ok(request) => EditorOutcome::Save(request),
                    Err(e) => EditorOutcome::Invalid(e.to_string()),
                });
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    EditorField::Title => EditorField::Content,
                    EditorField::Content => EditorField::Title,
                };
            }
            KeyCode::Enter => match self.focus {
                // Enter in the title jumps to the content, like moving
                // past a single-line input
                EditorField::Title => self.focus = EditorField::Content,
                EditorField::Content => self.content.push('\n'),
            },
            KeyCode::Backspace => {
                match self.focus {
                    EditorField::Title => self.title.pop(),
                    EditorField::Content => self.content.pop(),
                };
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.focus {
                    EditorField::Title => {
                        if self.title.chars().count() < MAX_TITLE_LEN {
                            self.title.push(c);
                        }
                    }
                    EditorField::Content => self.content.push(c),
                }
            }
            _ => {}
        }
        None
    }

    /// Render the modal over the given area.
    pub fn render(&self, frame: &mut Frame, area: Rect, busy: bool) {
        let heading = if self.editing.is_some() {
            "Edit Note"
        } else {
            "New Note"
        };

        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", heading));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title input
                Constraint::Min(3),    // Content input
                Constraint::Length(1), // Hints
            ])
            .split(inner);

        let focus_style = Style::default().fg(Color::Cyan);
        let blur_style = Style::default().fg(Color::DarkGray);

        let (title_style, content_style) = match self.focus {
            EditorField::Title => (focus_style, blur_style),
            EditorField::Content => (blur_style, focus_style),
        };

        let title_cursor = if self.focus == EditorField::Title { "_" } else { "" };
        let title_input = Paragraph::new(format!("{}{}", self.title, title_cursor)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(title_style)
                .title(" Title "),
        );
        frame.render_widget(title_input, rows[0]);

        let content_cursor = if self.focus == EditorField::Content { "_" } else { "" };
        let content_input = Paragraph::new(format!("{}{}", self.content, content_cursor))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(content_style)
                    .title(" Content "),
            );
        frame.render_widget(content_input, rows[1]);

        let hint = if busy {
            " Saving..."
        } else {
            " Ctrl+S:Save  Tab:Switch field  Esc:Cancel"
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            rows[2],
        );
    }
}

impl Default for EditorView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(view: &mut EditorView, text: &str) {
        for c in text.chars() {
            view.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn sample_note() -> Note {
        Note {
            id: "n-1".to_string(),
            title: "Old title".to_string(),
            content: "Old content".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_create_starts_empty() {
        let mut editor = EditorView::new();
        editor.open_create();
        assert!(editor.is_open());
        assert!(editor.save_request().is_err());
    }

    #[test]
    fn test_open_edit_prefills_from_note() {
        let mut editor = EditorView::new();
        editor.open_edit(&sample_note());
        let request = editor.save_request().unwrap();
        assert_eq!(request.title, "Old title");
        assert_eq!(request.content, "Old content");
        assert_eq!(
            request.target,
            SaveTarget::Update {
                id: "n-1".to_string()
            }
        );
    }

    #[test]
    fn test_create_save_request_targets_create() {
        let mut editor = EditorView::new();
        editor.open_create();
        type_text(&mut editor, "T");
        editor.handle_key(press(KeyCode::Tab));
        type_text(&mut editor, "C");
        let request = editor.save_request().unwrap();
        assert_eq!(request.target, SaveTarget::Create);
        assert_eq!(request.title, "T");
        assert_eq!(request.content, "C");
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut editor = EditorView::new();
        editor.open_create();
        editor.handle_key(press(KeyCode::Tab));
        type_text(&mut editor, "content only");
        match editor.handle_key(ctrl('s')) {
            Some(EditorOutcome::Invalid(msg)) => {
                assert!(msg.contains("title and content"));
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_only_content_is_rejected() {
        let mut editor = EditorView::new();
        editor.open_create();
        type_text(&mut editor, "Title");
        editor.handle_key(press(KeyCode::Tab));
        type_text(&mut editor, "   ");
        assert!(editor.save_request().is_err());
    }

    #[test]
    fn test_ctrl_s_emits_save_when_valid() {
        let mut editor = EditorView::new();
        editor.open_create();
        type_text(&mut editor, "T");
        editor.handle_key(press(KeyCode::Tab));
        type_text(&mut editor, "C");
        match editor.handle_key(ctrl('s')) {
            Some(EditorOutcome::Save(request)) => assert_eq!(request.title, "T"),
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn test_esc_cancels() {
        let mut editor = EditorView::new();
        editor.open_create();
        assert_eq!(
            editor.handle_key(press(KeyCode::Esc)),
            Some(EditorOutcome::Cancel)
        );
    }

    #[test]
    fn test_close_resets_state() {
        let mut editor = EditorView::new();
        editor.open_edit(&sample_note());
        editor.close();
        assert!(!editor.is_open());
        editor.open_create();
        assert!(editor.save_request().is_err());
    }

    #[test]
    fn test_enter_in_content_inserts_newline() {
        let mut editor = EditorView::new();
        editor.open_create();
        type_text(&mut editor, "T");
        editor.handle_key(press(KeyCode::Tab));
        type_text(&mut editor, "line one");
        editor.handle_key(press(KeyCode::Enter));
        type_text(&mut editor, "line two");
        let request = editor.save_request().unwrap();
        assert_eq!(request.content, "line one\nline two");
    }

    #[test]
    fn test_title_capped_at_max_length() {
        let mut editor = EditorView::new();
        editor.open_create();
        for _ in 0..(MAX_TITLE_LEN + 10) {
            editor.handle_key(press(KeyCode::Char('a')));
        }
        editor.handle_key(press(KeyCode::Tab));
        type_text(&mut editor, "C");
        let request = editor.save_request().unwrap();
        assert_eq!(request.title.chars().count(), MAX_TITLE_LEN);
    }
}

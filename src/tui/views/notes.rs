//! Notes view - the note list and the delete confirmation dialog.
//!
//! The list is a cache of server state: loaded once on entry, then
//! mutated locally after each successful CRUD call. Creates prepend
//! (newest first), edits replace in place, deletes remove by id. The
//! shell issues the network calls; the `apply_*` methods here are pure
//! list mutations applied only after a call succeeds.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::models::Note;

/// What the notes screen asked the shell to do.
#[derive(Debug, Clone, PartialEq)]
pub enum NotesAction {
    /// Open the editor for a new note
    OpenCreate,
    /// Open the editor for the selected note
    OpenEdit(Note),
    /// Delete confirmed; issue the request
    Delete(Note),
    /// Re-fetch the list from the server
    Refresh,
    /// Clear the session and return to the auth flow
    Logout,
    /// Leave the application
    Quit,
}

/// State for the notes screen.
pub struct NotesView {
    notes: Vec<Note>,
    selected: usize,
    list_state: ListState,
    /// True while the initial fetch is in flight
    loading: bool,
    /// Note awaiting delete confirmation
    confirm_delete: Option<Note>,
}

impl NotesView {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            notes: Vec::new(),
            selected: 0,
            list_state,
            loading: true,
            confirm_delete: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.selected)
    }

    /// Replace the list with freshly fetched server state.
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.loading = false;
        self.clamp_selection();
    }

    /// Mark the initial fetch as finished without data (it failed).
    /// Errors are never retried automatically; the user can re-fetch
    /// with the refresh key.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Prepend a newly created note and select it.
    pub fn apply_created(&mut self, note: Note) {
        self.notes.insert(0, note);
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    /// Mirror a successful update into the list: same id, same
    /// created_at, new title and content. Order and length unchanged.
    pub fn apply_updated(&mut self, id: &str, title: &str, content: &str) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
            note.title = title.to_string();
            note.content = content.to_string();
        }
    }

    /// Remove the note with the given id.
    pub fn apply_deleted(&mut self, id: &str) {
        self.notes.retain(|n| n.id != id);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.notes.len() {
            self.selected = self.notes.len().saturating_sub(1);
        }
        self.list_state.select(Some(self.selected));
    }

    fn select_next(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.notes.len() - 1);
        self.list_state.select(Some(self.selected));
    }

    fn select_previous(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
        self.list_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    fn select_last(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        self.selected = self.notes.len() - 1;
        self.list_state.select(Some(self.selected));
    }

    /// Handle a keypress, possibly producing an action for the shell.
    ///
    /// `busy` disables the triggers for save/delete while a request is
    /// in flight; navigation stays live.
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> Option<NotesAction> {
        // Confirmation dialog swallows all keys while open
        if let Some(note) = self.confirm_delete.clone() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    // Keep the dialog open while a request is in flight
                    // so the confirmation isn't silently dropped
                    if busy {
                        return None;
                    }
                    self.confirm_delete = None;
                    return Some(NotesAction::Delete(note));
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.confirm_delete = None;
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(NotesAction::Quit),
            KeyCode::Char('a') => return Some(NotesAction::OpenCreate),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(note) = self.selected_note() {
                    return Some(NotesAction::OpenEdit(note.clone()));
                }
            }
            KeyCode::Char('d') => {
                // First step of the two-step delete
                if !busy {
                    self.confirm_delete = self.selected_note().cloned();
                }
            }
            KeyCode::Char('r') => return Some(NotesAction::Refresh),
            KeyCode::Char('l') => return Some(NotesAction::Logout),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),
            _ => {}
        }
        None
    }

    /// Render the list (or the loading/empty placeholders) and the
    /// delete confirmation dialog when one is pending.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.loading {
            let loading = Paragraph::new("Loading notes...")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" My Notes "));
            frame.render_widget(loading, area);
            return;
        }

        if self.notes.is_empty() {
            let empty = Paragraph::new("No notes yet\n\nPress a to create your first note")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" My Notes "));
            frame.render_widget(empty, area);
        } else {
            let preview_width = area.width.saturating_sub(22) as usize;
            let items: Vec<ListItem> = self
                .notes
                .iter()
                .enumerate()
                .map(|(idx, note)| {
                    let marker = if idx == self.selected { ">" } else { " " };
                    let line = Line::from(vec![
                        Span::raw(format!(" {} ", marker)),
                        Span::styled(
                            format!("{:<24}", truncate(&note.title, 24)),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(" {:<width$}", note.preview(preview_width), width = preview_width),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(
                            format!(" {}", note.display_date()),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]);
                    let style = if idx == self.selected {
                        Style::default().bg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    ListItem::new(line).style(style)
                })
                .collect();

            let title = format!(" My Notes ({}) ", self.notes.len());
            let list =
                List::new(items).block(Block::default().borders(Borders::ALL).title(title));
            frame.render_stateful_widget(list, area, &mut self.list_state);
        }

        if let Some(note) = &self.confirm_delete {
            self.render_confirm_dialog(frame, area, note.title.clone());
        }
    }

    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, title: String) {
        let width = area.width.clamp(20, 50).min(area.width);
        let height = 5u16.min(area.height);
        let dialog = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, dialog);
        let text = format!(
            "Delete \"{}\"?\n\ny:Delete  n:Cancel",
            truncate(&title, width.saturating_sub(12) as usize)
        );
        let prompt = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Delete Note "),
        );
        frame.render_widget(prompt, dialog);
    }
}

impl Default for NotesView {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("content of {}", id),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn view_with(notes: Vec<Note>) -> NotesView {
        let mut view = NotesView::new();
        view.set_notes(notes);
        view
    }

    #[test]
    fn test_apply_created_prepends_matching_entry() {
        let mut view = view_with(vec![note("1", "first"), note("2", "second")]);
        let created = Note {
            id: "9".to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            created_at: Utc::now(),
        };
        view.apply_created(created);

        assert_eq!(view.notes().len(), 3);
        assert_eq!(view.notes()[0].id, "9");
        assert_eq!(view.notes()[0].title, "T");
        assert_eq!(view.notes()[0].content, "C");
        assert_eq!(view.notes()[1].id, "1");
    }

    #[test]
    fn test_apply_updated_replaces_in_place() {
        let mut view = view_with(vec![note("1", "first"), note("2", "second"), note("3", "third")]);
        let original_created_at = view.notes()[1].created_at;

        view.apply_updated("2", "new title", "new content");

        let ids: Vec<&str> = view.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        let updated = &view.notes()[1];
        assert_eq!(updated.title, "new title");
        assert_eq!(updated.content, "new content");
        assert_eq!(updated.created_at, original_created_at);
    }

    #[test]
    fn test_apply_updated_unknown_id_is_noop() {
        let mut view = view_with(vec![note("1", "first")]);
        view.apply_updated("nope", "t", "c");
        assert_eq!(view.notes()[0].title, "first");
    }

    #[test]
    fn test_apply_deleted_removes_exactly_one() {
        let mut view = view_with(vec![note("1", "first"), note("2", "second"), note("3", "third")]);
        view.apply_deleted("2");

        let ids: Vec<&str> = view.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_apply_deleted_clamps_selection() {
        let mut view = view_with(vec![note("1", "a"), note("2", "b")]);
        view.handle_key(press(KeyCode::Char('G')), false);
        view.apply_deleted("2");
        assert_eq!(view.selected_note().map(|n| n.id.as_str()), Some("1"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut view = view_with(vec![note("1", "a")]);

        // First press only opens the dialog
        assert_eq!(view.handle_key(press(KeyCode::Char('d')), false), None);
        // Confirming fires the action
        match view.handle_key(press(KeyCode::Char('y')), false) {
            Some(NotesAction::Delete(n)) => assert_eq!(n.id, "1"),
            other => panic!("expected delete, got {:?}", other),
        }
        // List untouched until the request succeeds
        assert_eq!(view.notes().len(), 1);
    }

    #[test]
    fn test_delete_cancel_keeps_note() {
        let mut view = view_with(vec![note("1", "a")]);
        view.handle_key(press(KeyCode::Char('d')), false);
        assert_eq!(view.handle_key(press(KeyCode::Char('n')), false), None);
        // Next keypress is back to normal handling
        match view.handle_key(press(KeyCode::Char('a')), false) {
            Some(NotesAction::OpenCreate) => {}
            other => panic!("expected open-create, got {:?}", other),
        }
    }

    #[test]
    fn test_confirm_while_busy_keeps_dialog_open() {
        let mut view = view_with(vec![note("1", "a")]);
        view.handle_key(press(KeyCode::Char('d')), false);

        // Confirming while a request is in flight does nothing, and the
        // dialog stays up so the confirmation isn't lost
        assert_eq!(view.handle_key(press(KeyCode::Char('y')), true), None);
        match view.handle_key(press(KeyCode::Char('y')), false) {
            Some(NotesAction::Delete(n)) => assert_eq!(n.id, "1"),
            other => panic!("expected delete, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_trigger_disabled_while_busy() {
        let mut view = view_with(vec![note("1", "a")]);
        view.handle_key(press(KeyCode::Char('d')), true);
        // No dialog opened, so 'y' is not a confirmation
        assert_eq!(view.handle_key(press(KeyCode::Char('y')), true), None);
    }

    #[test]
    fn test_edit_action_carries_selected_note() {
        let mut view = view_with(vec![note("1", "a"), note("2", "b")]);
        view.handle_key(press(KeyCode::Char('j')), false);
        match view.handle_key(press(KeyCode::Enter), false) {
            Some(NotesAction::OpenEdit(n)) => assert_eq!(n.id, "2"),
            other => panic!("expected open-edit, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_on_empty_list_does_nothing() {
        let mut view = view_with(Vec::new());
        assert_eq!(view.handle_key(press(KeyCode::Enter), false), None);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut view = view_with(vec![note("1", "a"), note("2", "b")]);
        view.handle_key(press(KeyCode::Char('k')), false);
        assert_eq!(view.selected_note().map(|n| n.id.as_str()), Some("1"));
        view.handle_key(press(KeyCode::Char('j')), false);
        view.handle_key(press(KeyCode::Char('j')), false);
        assert_eq!(view.selected_note().map(|n| n.id.as_str()), Some("2"));
        view.handle_key(press(KeyCode::Char('g')), false);
        assert_eq!(view.selected_note().map(|n| n.id.as_str()), Some("1"));
    }

    #[test]
    fn test_logout_and_refresh_actions() {
        let mut view = view_with(Vec::new());
        assert_eq!(
            view.handle_key(press(KeyCode::Char('l')), false),
            Some(NotesAction::Logout)
        );
        assert_eq!(
            view.handle_key(press(KeyCode::Char('r')), false),
            Some(NotesAction::Refresh)
        );
    }

    #[test]
    fn test_set_notes_clears_loading() {
        let mut view = NotesView::new();
        assert!(view.is_loading());
        view.set_notes(Vec::new());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_finish_loading_marks_fetch_done_without_data() {
        let mut view = NotesView::new();
        view.finish_loading();
        assert!(!view.is_loading());
        assert!(view.notes().is_empty());
    }
}

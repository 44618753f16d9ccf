//! TUI views
//!
//! One struct per screen: the auth form, the notes list, and the note
//! editor modal. Each owns its transient state and renders into an area
//! handed down by the shell.

mod auth;
mod editor;
mod notes;

pub use auth::{AuthMode, AuthOutcome, AuthRequest, AuthView};
pub use editor::{EditorOutcome, EditorView, SaveRequest, SaveTarget};
pub use notes::{NotesAction, NotesView};

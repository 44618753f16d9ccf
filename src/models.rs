//! Data models for jot entities.
//!
//! The only record the client manages is `Note`. The in-memory note list
//! is a cache of server state owned by the notes view: it is loaded once
//! on entry and mutated locally after successful CRUD calls, with no
//! reconciliation beyond that initial load.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// A note as held in the in-memory list and exchanged with the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned identifier, unique within the list
    pub id: String,

    /// Note title (non-blank whenever persisted)
    pub title: String,

    /// Note body (non-blank whenever persisted)
    pub content: String,

    /// Creation timestamp; set by the server, or locally when the server
    /// omits it from a create response
    #[serde(rename = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// First line of the content, truncated for list display.
    pub fn preview(&self, max: usize) -> String {
        let line = self.content.lines().next().unwrap_or_default();
        if line.chars().count() > max {
            let truncated: String = line.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", truncated)
        } else {
            line.to_string()
        }
    }

    /// Creation time formatted in the local timezone for list display.
    pub fn display_date(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

/// Fallback id for a create response that omitted one: the current unix
/// timestamp in milliseconds, matching the server's string id type.
pub fn local_fallback_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(content: &str) -> Note {
        Note {
            id: "n-1".to_string(),
            title: "Title".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_note_deserialize_camel_case() {
        let json = r#"{
            "id": "9",
            "title": "T",
            "content": "C",
            "createdAt": "2024-03-01T12:00:00Z"
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, "9");
        assert_eq!(note.title, "T");
        assert_eq!(note.content, "C");
        assert_eq!(note.created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_note_deserialize_missing_created_at_defaults_to_now() {
        let json = r#"{"id": "9", "title": "T", "content": "C"}"#;

        let before = Utc::now();
        let note: Note = serde_json::from_str(json).unwrap();
        assert!(note.created_at >= before);
        assert!(note.created_at <= Utc::now());
    }

    #[test]
    fn test_note_serialize_uses_camel_case_key() {
        let json = serde_json::to_string(&note("C")).unwrap();
        assert!(json.contains("createdAt"));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_preview_takes_first_line() {
        let n = note("first line\nsecond line");
        assert_eq!(n.preview(40), "first line");
    }

    #[test]
    fn test_preview_truncates_long_line() {
        let n = note("abcdefghij");
        assert_eq!(n.preview(8), "abcde...");
    }

    #[test]
    fn test_local_fallback_id_is_numeric() {
        let id = local_fallback_id();
        assert!(id.parse::<i64>().is_ok());
    }
}

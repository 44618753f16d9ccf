//! Jot - a terminal client for a remote note-taking service.
//!
//! This library provides the core functionality for the `jot` binary:
//! the API client, the session-token store, and the TUI screens for
//! authentication and note management.

pub mod api;
pub mod cli;
pub mod models;
pub mod session;
pub mod tui;

/// Library-level error type for jot operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server rejected the credentials, or the auth response was missing
    /// its token field.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Any other non-success HTTP or transport outcome. Never retried.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Client-side validation stopped the action before any request fired.
    #[error("{0}")]
    Validation(String),
}

/// Result type alias for jot operations.
pub type Result<T> = std::result::Result<T, Error>;

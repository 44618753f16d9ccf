//! CLI argument definitions for jot.

use std::path::PathBuf;

use clap::Parser;

/// Long version string including build metadata.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("JOT_GIT_COMMIT"),
    ", built ",
    env!("JOT_BUILD_TIMESTAMP"),
    ")"
);

/// Jot - a terminal client for a remote note-taking service.
///
/// Launches a keyboard-driven TUI: sign in (or register), then browse,
/// create, edit, and delete your notes.
#[derive(Parser, Debug)]
#[command(name = "jot")]
#[command(author, version, long_version = LONG_VERSION)]
#[command(about = "A terminal client for a remote note-taking service", long_about = None)]
pub struct Cli {
    /// Base URL of the notes API.
    /// Can also be set via the JOT_API_BASE environment variable.
    #[arg(long = "api-base", env = "JOT_API_BASE", default_value = crate::api::DEFAULT_API_BASE)]
    pub api_base: String,

    /// Directory for local state (session token, logs).
    /// Can also be set via the JOT_DATA_DIR environment variable.
    #[arg(long = "data-dir", env = "JOT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter directive written to the log file (e.g. "jot=debug").
    #[arg(long = "log-level", default_value = "jot=info")]
    pub log_level: String,
}

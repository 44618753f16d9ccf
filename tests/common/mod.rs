//! Common test utilities for jot integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch
//! the user's real `~/.local/share/jot/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated data directory.
///
/// The `jot()` method returns a `Command` that sets `JOT_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the jot binary with isolated data directory.
    pub fn jot(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jot"));
        cmd.env("JOT_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

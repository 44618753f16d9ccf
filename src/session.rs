//! Session token storage.
//!
//! The token is an opaque credential issued by the backend on
//! login/register. It lives in a single file under the jot data
//! directory and nothing else persists it. Absence of the file is the
//! normal logged-out state, not an error.
//!
//! Location: `~/.local/share/jot/session-token` (platform equivalent via
//! `dirs`), overridable with the `JOT_DATA_DIR` environment variable or
//! the `--data-dir` flag. The file is created with 0600 permissions on
//! unix because it contains a secret.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Name of the token file inside the data directory.
const TOKEN_FILE: &str = "session-token";

/// File mode for the token file on unix (owner read/write only).
#[cfg(unix)]
pub const TOKEN_FILE_MODE: u32 = 0o600;

/// Store for the persisted session token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at the resolved jot data directory.
    ///
    /// Resolution order: `JOT_DATA_DIR` env var, then the platform local
    /// data directory, then the current directory as a last resort.
    pub fn new() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }

    /// Create a store rooted at an explicit directory (DI for tests and
    /// the `--data-dir` flag).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
        }
    }

    /// Path of the token file.
    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }

    /// Read the persisted token, if any.
    ///
    /// Never errors: a missing, unreadable, or blank file all read as
    /// absence, which is a valid logged-out state.
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(self.token_path()).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Persist the token, overwriting any prior value.
    pub fn save(&self, token: &str) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.token_path();
        fs::write(&path, token)?;
        restrict_permissions(&path)?;
        Ok(())
    }

    /// Remove the persisted token. Idempotent: clearing an already-empty
    /// store succeeds.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(self.token_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the jot data directory: `JOT_DATA_DIR` > platform dir > cwd.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("JOT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|d| d.join("jot"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(TOKEN_FILE_MODE);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_absent_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store.save("tok1").unwrap();
        assert_eq!(store.load(), Some("tok1".to_string()));
    }

    #[test]
    fn test_save_overwrites_prior_token() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store.save("old").unwrap();
        store.save("new").unwrap();
        assert_eq!(store.load(), Some("new".to_string()));
    }

    #[test]
    fn test_clear_removes_token() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store.save("tok1").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_on_empty_store_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        std::fs::write(store.token_path(), "  \n").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_load_trims_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        std::fs::write(store.token_path(), "tok1\n").unwrap();
        assert_eq!(store.load(), Some("tok1".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store.save("tok1").unwrap();

        let mode = std::fs::metadata(store.token_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, TOKEN_FILE_MODE);
    }
}

//! # Session Vault
//!
//! The single persistence boundary for the session principal.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Vault                                    │
//! │                                                                         │
//! │  save(user)  ──► <data dir>/user.json  (serialized principal)          │
//! │  load()      ──► Some(User) | None     (absent OR malformed ⇒ None)    │
//! │  clear()     ──► key removed                                            │
//! │                                                                         │
//! │  Called exactly at session transition points:                           │
//! │    login, logout, email update, name update, guard rehydration.         │
//! │  Malformed content is logged and recovered as logged-out —             │
//! │  NEVER surfaced to the user.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use stockroom_core::{User, SESSION_STORAGE_KEY};

/// Durable storage for the session principal.
///
/// One well-known key (`user`) under a configurable data directory.
#[derive(Debug, Clone)]
pub struct SessionVault {
    dir: PathBuf,
}

impl SessionVault {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SessionVault { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", SESSION_STORAGE_KEY))
    }

    /// The directory this vault writes under.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads the persisted principal.
    ///
    /// Absent key or malformed content is treated as logged-out, never
    /// as an error.
    pub fn load(&self) -> Option<User> {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), %err, "session vault unreadable; treating as logged out");
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(path = %path.display(), %err, "session vault malformed; treating as logged out");
                None
            }
        }
    }

    /// Persists the principal under the session key.
    pub fn save(&self, user: &User) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let raw = serde_json::to_string(user)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        std::fs::write(self.path(), raw)?;
        debug!(user_id = user.id, "session persisted");
        Ok(())
    }

    /// Removes the session key. Idempotent.
    pub fn clear(&self) {
        match std::fs::remove_file(self.path()) {
            Ok(()) => debug!("session cleared"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(%err, "failed to clear session vault"),
        }
    }

    /// True iff the session key currently exists.
    pub fn contains_session(&self) -> bool {
        self.path().exists()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

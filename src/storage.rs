//! Single local key-value slot caching the logged-in session.
//!
//! The slot is a small JSON file written on login and cleared on logout. At
//! startup it is read once so a restart does not log the user out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: String,
    pub user: User,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionSlot {
    path: PathBuf,
}

impl SessionSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing or unreadable slot yields `None`.
    pub fn load(&self) -> Option<StoredSession> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session slot {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!("Discarding corrupt session slot {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Overwrite the slot with the given session
    pub fn save(&self, session_id: &str, user: &User) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let stored = StoredSession {
            session_id: session_id.to_string(),
            user: user.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(io::Error::other)?;
        std::fs::write(&self.path, json)
    }

    /// Empty the slot. Clearing an already empty slot is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

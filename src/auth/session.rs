//! In-memory login sessions.
//!
//! Maps the session cookie value to the id of the logged-in account.
//! Sessions expire after a configurable duration of inactivity.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::config;

/// Session entry with last access time for expiration
#[derive(Debug, Clone)]
struct SessionEntry {
  user_id: String,
  last_access: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionStore {
  sessions: HashMap<String, SessionEntry>,
  expiry: Duration,
}

impl SessionStore {
  pub fn new(expiry_hours: i64) -> Self {
    let expiry = Duration::try_hours(expiry_hours).unwrap_or_else(|| {
      tracing::warn!("Session expiry of {} hours is out of range, using the default", expiry_hours);
      Duration::hours(config::DEFAULT_SESSION_EXPIRY_HOURS)
    });
    Self {
      sessions: HashMap::new(),
      expiry,
    }
  }

  /// Start a session for a user and return its id
  pub fn create(&mut self, user_id: &str) -> String {
    let session_id = generate_session_id();
    self.insert(&session_id, user_id);
    session_id
  }

  /// Register a session under a known id (restoring a saved login)
  pub fn insert(&mut self, session_id: &str, user_id: &str) {
    self.sessions.insert(
      session_id.to_string(),
      SessionEntry {
        user_id: user_id.to_string(),
        last_access: Utc::now(),
      },
    );
  }

  /// Resolve a session to its user id, refreshing its last access time
  pub fn touch(&mut self, session_id: &str) -> Option<String> {
    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      self.cleanup_expired();
    }

    let now = Utc::now();
    let expiry = self.expiry;
    match self.sessions.get_mut(session_id) {
      Some(entry) if now - entry.last_access <= expiry => {
        entry.last_access = now;
        Some(entry.user_id.clone())
      }
      Some(_) => {
        self.sessions.remove(session_id);
        None
      }
      None => None,
    }
  }

  /// End a session, returning the user it belonged to
  pub fn remove(&mut self, session_id: &str) -> Option<String> {
    self.sessions.remove(session_id).map(|entry| entry.user_id)
  }

  /// Drop every session of a user (account deleted)
  pub fn remove_user(&mut self, user_id: &str) -> usize {
    let before = self.sessions.len();
    self.sessions.retain(|_, entry| entry.user_id != user_id);
    before - self.sessions.len()
  }

  pub fn len(&self) -> usize {
    self.sessions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.is_empty()
  }

  /// Clean up expired sessions
  fn cleanup_expired(&mut self) {
    let expiry = Utc::now() - self.expiry;
    self.sessions.retain(|_, entry| entry.last_access > expiry);
  }
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

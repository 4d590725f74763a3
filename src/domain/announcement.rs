use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broadcast message shown to every student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
  pub id: String,
  pub title: String,
  pub content: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAnnouncement {
  pub title: String,
  #[serde(default)]
  pub content: String,
}

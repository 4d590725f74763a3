use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Student,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Admin => "admin",
      Self::Student => "student",
    }
  }
}

impl std::fmt::Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A portal account.
///
/// Admins ignore `course_access`. Entries that point at courses no longer in
/// the catalog are kept and simply never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: String,
  pub name: String,
  pub email: String,
  pub role: Role,
  /// Global gate: when false the student sees no classes at all
  pub can_access_classes: bool,
  #[serde(default)]
  pub course_access: BTreeSet<String>,
}

impl User {
  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }

  pub fn has_course(&self, course_id: &str) -> bool {
    self.course_access.contains(course_id)
  }
}

/// Input for creating a student. Role is always student.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStudent {
  pub name: String,
  pub email: String,
  #[serde(default = "default_class_access")]
  pub can_access_classes: bool,
  #[serde(default)]
  pub course_access: Option<Vec<String>>,
}

fn default_class_access() -> bool {
  true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
  pub name: Option<String>,
  pub email: Option<String>,
  pub can_access_classes: Option<bool>,
  pub course_access: Option<Vec<String>>,
}

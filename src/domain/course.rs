use serde::{Deserialize, Serialize};

/// Icon shown on a course card. Unknown tags fall back to `BookOpen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseIcon {
  Code,
  Megaphone,
  Palette,
  #[default]
  BookOpen,
}

impl CourseIcon {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Code => "Code",
      Self::Megaphone => "Megaphone",
      Self::Palette => "Palette",
      Self::BookOpen => "BookOpen",
    }
  }

  pub fn from_tag(tag: &str) -> Self {
    match tag {
      "Code" => Self::Code,
      "Megaphone" => Self::Megaphone,
      "Palette" => Self::Palette,
      _ => Self::BookOpen,
    }
  }
}

impl From<String> for CourseIcon {
  fn from(tag: String) -> Self {
    Self::from_tag(&tag)
  }
}

impl From<CourseIcon> for String {
  fn from(icon: CourseIcon) -> Self {
    icon.as_str().to_string()
  }
}

impl std::fmt::Display for CourseIcon {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
  pub id: String,
  pub name: String,
  pub description: String,
  #[serde(default)]
  pub icon: CourseIcon,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub icon: CourseIcon,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
  pub name: Option<String>,
  pub description: Option<String>,
  pub icon: Option<CourseIcon>,
}

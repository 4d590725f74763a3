use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
  Video,
  Text,
}

impl ClassKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Video => "video",
      Self::Text => "text",
    }
  }
}

impl std::fmt::Display for ClassKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Metadata of an uploaded video kept in the media store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFile {
  pub id: String,
  pub file_name: String,
  pub content_type: String,
  pub size: usize,
}

/// Class payload. Exactly one variant's data exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClassContent {
  Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<VideoFile>,
  },
  Text {
    #[serde(default)]
    html: String,
  },
}

impl ClassContent {
  pub fn video_url(url: impl Into<String>) -> Self {
    Self::Video {
      url: Some(url.into()),
      file: None,
    }
  }

  pub fn text(html: impl Into<String>) -> Self {
    Self::Text { html: html.into() }
  }

  pub fn kind(&self) -> ClassKind {
    match self {
      Self::Video { .. } => ClassKind::Video,
      Self::Text { .. } => ClassKind::Text,
    }
  }

  pub fn video_file(&self) -> Option<&VideoFile> {
    match self {
      Self::Video { file, .. } => file.as_ref(),
      Self::Text { .. } => None,
    }
  }
}

/// A lesson inside a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
  pub id: String,
  pub title: String,
  pub description: String,
  pub course_id: String,
  pub content: ClassContent,
  pub created_at: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

impl Class {
  pub fn kind(&self) -> ClassKind {
    self.content.kind()
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClass {
  pub title: String,
  #[serde(default)]
  pub description: String,
  pub course_id: String,
  pub content: ClassContent,
}

/// Partial update. A new `content` replaces the old one wholesale, which is
/// also how a class switches between video and text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassPatch {
  pub title: Option<String>,
  pub description: Option<String>,
  pub course_id: Option<String>,
  pub content: Option<ClassContent>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_content_tagged_by_type() {
    let json = serde_json::to_value(ClassContent::video_url("https://youtu.be/abc")).unwrap();
    assert_eq!(json["type"], "video");
    assert_eq!(json["url"], "https://youtu.be/abc");
    assert!(json.get("html").is_none());

    let content: ClassContent =
      serde_json::from_str(r#"{"type":"text","html":"<p>Hi</p>"}"#).unwrap();
    assert_eq!(content.kind(), ClassKind::Text);
  }

  #[test]
  fn test_text_payload_ignores_video_fields() {
    let content: ClassContent =
      serde_json::from_str(r#"{"type":"text","html":"<p>x</p>","url":"https://x"}"#).unwrap();
    assert_eq!(content, ClassContent::text("<p>x</p>"));
    assert!(content.video_file().is_none());
  }

  #[test]
  fn test_video_without_source_is_valid() {
    let content: ClassContent = serde_json::from_str(r#"{"type":"video"}"#).unwrap();
    assert_eq!(content, ClassContent::Video { url: None, file: None });
  }
}

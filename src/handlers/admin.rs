//! Admin management endpoints.
//!
//! Every handler first turns the caller into an [`AdminGrant`]; students get
//! `403 UNAUTHORIZED` before any input is looked at.

use axum::{
  Json,
  extract::{Multipart, Path, State, multipart::MultipartError},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::access::{self, AdminGrant};
use crate::auth::{AuthContext, password};
use crate::catalog::Overview;
use crate::domain::{
  Announcement, Class, ClassContent, ClassPatch, Course, CoursePatch, NewAnnouncement, NewClass,
  NewCourse, NewStudent, StudentPatch, User, VideoFile,
};
use crate::error::{ApiError, CatalogError, LogOnError, MediaError, RecordKind};
use crate::handlers::JsonBody;
use crate::state::AppState;

type Created<T> = (StatusCode, Json<T>);

fn grant(auth: &AuthContext) -> Result<AdminGrant, ApiError> {
  Ok(access::authorize(&auth.user)?)
}

// ==================== Overview ====================

#[derive(Debug, Serialize)]
pub struct OverviewView {
  #[serde(flatten)]
  pub counts: Overview,
  pub uploaded_videos: usize,
}

/// GET /admin/overview
pub async fn overview(
  auth: AuthContext,
  State(state): State<AppState>,
) -> Result<Json<OverviewView>, ApiError> {
  grant(&auth)?;
  let counts = state.read_catalog()?.overview();
  let uploaded_videos = state.media()?.len();
  Ok(Json(OverviewView {
    counts,
    uploaded_videos,
  }))
}

// ==================== Courses ====================

pub async fn create_course(
  auth: AuthContext,
  State(state): State<AppState>,
  JsonBody(data): JsonBody<NewCourse>,
) -> Result<Created<Course>, ApiError> {
  let grant = grant(&auth)?;
  let course = state.write_catalog()?.add_course(&grant, data)?;
  Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
  JsonBody(patch): JsonBody<CoursePatch>,
) -> Result<Json<Course>, ApiError> {
  let grant = grant(&auth)?;
  let course = state.write_catalog()?.update_course(&grant, &id, patch)?;
  Ok(Json(course))
}

pub async fn delete_course(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
  let grant = grant(&auth)?;
  let course = state.write_catalog()?.delete_course(&grant, &id)?;
  Ok(Json(course))
}

// ==================== Classes ====================

pub async fn create_class(
  auth: AuthContext,
  State(state): State<AppState>,
  JsonBody(data): JsonBody<NewClass>,
) -> Result<Created<Class>, ApiError> {
  let grant = grant(&auth)?;
  check_file_ref(&data.content, None)?;
  let class = state.write_catalog()?.add_class(&grant, data)?;
  Ok((StatusCode::CREATED, Json(class)))
}

pub async fn update_class(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
  JsonBody(patch): JsonBody<ClassPatch>,
) -> Result<Json<Class>, ApiError> {
  let grant = grant(&auth)?;
  let (previous, class) = {
    let mut catalog = state.write_catalog()?;
    let current = catalog
      .class(&id)
      .ok_or_else(|| CatalogError::not_found(RecordKind::Class, &id))?;
    let current_file = current.content.video_file();
    if let Some(content) = &patch.content {
      check_file_ref(content, current_file)?;
    }
    let previous = current_file.map(|f| f.id.clone());
    (previous, catalog.update_class(&grant, &id, patch)?)
  };
  if let Some(old_file) = previous {
    release_video(&state, &old_file, Some(&class));
  }
  Ok(Json(class))
}

pub async fn delete_class(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Class>, ApiError> {
  let grant = grant(&auth)?;
  let class = state.write_catalog()?.delete_class(&grant, &id)?;
  if let Some(file) = class.content.video_file() {
    release_video(&state, &file.id, None);
  }
  Ok(Json(class))
}

/// Uploaded files are attached only by [`upload_video`]. Client JSON may carry
/// the class's current file back unchanged but never point at another one.
fn check_file_ref(
  content: &ClassContent,
  current: Option<&VideoFile>,
) -> Result<(), CatalogError> {
  match content.video_file() {
    Some(file) if Some(file) != current => Err(CatalogError::validation(
      "content",
      "video files can only be attached by uploading",
    )),
    _ => Ok(()),
  }
}

/// Drop an uploaded file once `class` (its former owner) no longer points at it
fn release_video(state: &AppState, file_id: &str, class: Option<&Class>) {
  let still_used = class
    .and_then(|c| c.content.video_file())
    .is_some_and(|f| f.id == file_id);
  if still_used {
    return;
  }
  if let Some(mut media) = state.media().log_warn("Failed to release video") {
    if media.remove(file_id).is_some() {
      tracing::debug!("Released uploaded video {}", file_id);
    }
  }
}

/// POST /admin/classes/{id}/video - Attach an mp4 upload to a class.
///
/// Expects a multipart form with a `file` field. The class becomes a video
/// class played from the upload, replacing any previous URL or file.
pub async fn upload_video(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
  mut multipart: Multipart,
) -> Result<Json<Class>, ApiError> {
  let grant = grant(&auth)?;
  let exists = state.read_catalog()?.class(&id).is_some();
  if !exists {
    return Err(CatalogError::not_found(RecordKind::Class, &id).into());
  }

  let limit = state.config.max_upload_bytes;
  let mut upload = None;
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| multipart_error(e, limit))?
  {
    if field.name() != Some("file") {
      continue;
    }
    let file_name = field.file_name().unwrap_or("video.mp4").to_string();
    let content_type = field
      .content_type()
      .unwrap_or("application/octet-stream")
      .to_string();
    let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
    upload = Some((file_name, content_type, bytes));
    break;
  }
  let (file_name, content_type, bytes) =
    upload.ok_or_else(|| ApiError::BadRequest("missing file field".into()))?;

  let video = state.media()?.store(&file_name, &content_type, bytes)?;
  let patch = ClassPatch {
    content: Some(ClassContent::Video {
      url: None,
      file: Some(video.clone()),
    }),
    ..Default::default()
  };

  let result = {
    let mut catalog = state.write_catalog()?;
    let previous = catalog
      .class(&id)
      .and_then(|c| c.content.video_file())
      .map(|f| f.id.clone());
    catalog
      .update_class(&grant, &id, patch)
      .map(|class| (previous, class))
  };
  match result {
    Ok((previous, class)) => {
      if let Some(old_file) = previous {
        release_video(&state, &old_file, Some(&class));
      }
      Ok(Json(class))
    }
    Err(e) => {
      // Class vanished while the upload was streaming
      release_video(&state, &video.id, None);
      Err(e.into())
    }
  }
}

fn multipart_error(e: MultipartError, limit: usize) -> ApiError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    MediaError::TooLarge { limit }.into()
  } else {
    ApiError::BadRequest(e.body_text())
  }
}

// ==================== Announcements ====================

pub async fn create_announcement(
  auth: AuthContext,
  State(state): State<AppState>,
  JsonBody(data): JsonBody<NewAnnouncement>,
) -> Result<Created<Announcement>, ApiError> {
  let grant = grant(&auth)?;
  let announcement = state.write_catalog()?.add_announcement(&grant, data)?;
  Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn delete_announcement(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Announcement>, ApiError> {
  let grant = grant(&auth)?;
  let announcement = state.write_catalog()?.delete_announcement(&grant, &id)?;
  Ok(Json(announcement))
}

// ==================== Students ====================

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
  #[serde(flatten)]
  pub student: NewStudent,
  /// Without a password the account exists but cannot log in
  pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
  #[serde(flatten)]
  pub patch: StudentPatch,
  pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CourseAccessRequest {
  pub granted: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClassAccessRequest {
  pub enabled: bool,
}

pub async fn list_students(
  auth: AuthContext,
  State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
  grant(&auth)?;
  Ok(Json(state.read_catalog()?.students().to_vec()))
}

pub async fn create_student(
  auth: AuthContext,
  State(state): State<AppState>,
  JsonBody(req): JsonBody<CreateStudentRequest>,
) -> Result<Created<User>, ApiError> {
  let grant = grant(&auth)?;
  let hash = hash_optional(req.password.as_deref())?;
  let student = state.write_catalog()?.add_student(&grant, req.student)?;
  if let Some(hash) = hash {
    state.credentials()?.set(&student.id, hash);
  }
  Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
  JsonBody(req): JsonBody<UpdateStudentRequest>,
) -> Result<Json<User>, ApiError> {
  let grant = grant(&auth)?;
  let hash = hash_optional(req.password.as_deref())?;
  let student = state.write_catalog()?.update_student(&grant, &id, req.patch)?;
  if let Some(hash) = hash {
    state.credentials()?.set(&student.id, hash);
  }
  Ok(Json(student))
}

pub async fn delete_student(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
  let grant = grant(&auth)?;
  let student = state.write_catalog()?.delete_student(&grant, &id)?;
  state.credentials()?.remove(&student.id);
  let ended = state.sessions()?.remove_user(&student.id);
  if ended > 0 {
    tracing::info!("Ended {} sessions of deleted student {}", ended, student.id);
  }
  Ok(Json(student))
}

/// PUT /admin/students/{id}/courses/{course_id}
pub async fn set_course_access(
  auth: AuthContext,
  State(state): State<AppState>,
  Path((id, course_id)): Path<(String, String)>,
  JsonBody(req): JsonBody<CourseAccessRequest>,
) -> Result<Json<User>, ApiError> {
  let grant = grant(&auth)?;
  let student = state
    .write_catalog()?
    .set_course_access(&grant, &id, &course_id, req.granted)?;
  Ok(Json(student))
}

/// PUT /admin/students/{id}/class-access
pub async fn set_class_access(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
  JsonBody(req): JsonBody<ClassAccessRequest>,
) -> Result<Json<User>, ApiError> {
  let grant = grant(&auth)?;
  let student = state
    .write_catalog()?
    .set_class_access(&grant, &id, req.enabled)?;
  Ok(Json(student))
}

/// Hash a supplied password; blank means "leave unchanged"
fn hash_optional(supplied: Option<&str>) -> Result<Option<String>, ApiError> {
  match supplied.filter(|p| !p.is_empty()) {
    Some(p) => password::hash_password(p)
      .map(Some)
      .map_err(|e| ApiError::Internal(format!("password hash: {}", e))),
    None => Ok(None),
  }
}

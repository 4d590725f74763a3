//! Student-facing views: dashboard, class content and uploaded media.

use axum::{
  Json,
  extract::{Path, State},
  http::header,
  response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::access::{self, Visibility};
use crate::auth::AuthContext;
use crate::content;
use crate::domain::{Announcement, Class, Course, User};
use crate::error::{ApiError, CatalogError, RecordKind};
use crate::state::AppState;

/// Everything the dashboard shows for one user
#[derive(Debug, Serialize)]
pub struct DashboardView {
  pub user: User,
  /// False when the class gate is closed, so the client can explain the empty list
  pub can_access_classes: bool,
  pub courses: Vec<Course>,
  pub classes: Vec<Class>,
  pub announcements: Vec<Announcement>,
}

/// GET /dashboard
pub async fn dashboard(
  auth: AuthContext,
  State(state): State<AppState>,
) -> Result<Json<DashboardView>, ApiError> {
  let catalog = state.read_catalog()?;
  let user = auth.user;

  let courses = access::visible_courses(&user, catalog.courses())
    .into_iter()
    .cloned()
    .collect();
  let classes = access::visible_classes(&user, catalog.classes(), catalog.courses())
    .into_iter()
    .cloned()
    .collect();

  Ok(Json(DashboardView {
    can_access_classes: user.is_admin() || user.can_access_classes,
    courses,
    classes,
    announcements: catalog.announcements().to_vec(),
    user,
  }))
}

/// GET /classes/{id} - Rendered class body, only when visible to the caller
pub async fn class_view(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
  let catalog = state.read_catalog()?;
  let class = catalog
    .class(&id)
    .filter(|c| access::class_visibility(&auth.user, c, catalog.courses()) == Visibility::Visible)
    .ok_or_else(|| CatalogError::not_found(RecordKind::Class, &id))?;

  content::render_class(class)
    .map(Html)
    .map_err(|e| ApiError::Internal(format!("class template: {}", e)))
}

/// GET /media/{id} - Uploaded video bytes, gated by the class that owns them
pub async fn media(
  auth: AuthContext,
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Response, ApiError> {
  let visible = {
    let catalog = state.read_catalog()?;
    catalog
      .class_with_video(&id)
      .is_some_and(|c| access::class_visibility(&auth.user, c, catalog.courses()) == Visibility::Visible)
  };
  if !visible {
    return Err(CatalogError::not_found(RecordKind::Class, &id).into());
  }

  let stored = state
    .media()?
    .get(&id)
    .cloned()
    .ok_or_else(|| CatalogError::not_found(RecordKind::Class, &id))?;

  Ok(([(header::CONTENT_TYPE, stored.meta.content_type)], stored.bytes).into_response())
}

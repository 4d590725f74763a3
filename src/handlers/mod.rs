pub mod admin;
pub mod dashboard;

use axum::{
  Router,
  extract::{DefaultBodyLimit, FromRequest, State},
  response::Html,
  routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::auth::{self, OptionalAuth};
use crate::content;
use crate::error::ApiError;
use crate::state::AppState;

/// JSON request body whose rejections use the API error shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Room for multipart boundaries and headers around an upload
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router
pub fn router(state: AppState) -> Router {
  let upload_limit = state.config.max_upload_bytes.saturating_add(UPLOAD_OVERHEAD_BYTES);

  Router::new()
    .route("/", get(landing))
    .route("/login", post(auth::login))
    .route("/logout", post(auth::logout))
    .route("/me", get(auth::me))
    .route("/dashboard", get(dashboard::dashboard))
    .route("/classes/{id}", get(dashboard::class_view))
    .route("/media/{id}", get(dashboard::media))
    .route("/admin/overview", get(admin::overview))
    .route("/admin/courses", post(admin::create_course))
    .route(
      "/admin/courses/{id}",
      put(admin::update_course).delete(admin::delete_course),
    )
    .route("/admin/classes", post(admin::create_class))
    .route(
      "/admin/classes/{id}",
      put(admin::update_class).delete(admin::delete_class),
    )
    .route(
      "/admin/classes/{id}/video",
      post(admin::upload_video).layer(DefaultBodyLimit::max(upload_limit)),
    )
    .route("/admin/announcements", post(admin::create_announcement))
    .route(
      "/admin/announcements/{id}",
      axum::routing::delete(admin::delete_announcement),
    )
    .route(
      "/admin/students",
      get(admin::list_students).post(admin::create_student),
    )
    .route(
      "/admin/students/{id}",
      put(admin::update_student).delete(admin::delete_student),
    )
    .route(
      "/admin/students/{id}/courses/{course_id}",
      put(admin::set_course_access),
    )
    .route(
      "/admin/students/{id}/class-access",
      put(admin::set_class_access),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// GET / - Public landing page listing every course
pub async fn landing(
  State(state): State<AppState>,
  OptionalAuth(auth): OptionalAuth,
) -> Result<Html<String>, ApiError> {
  let catalog = state.read_catalog()?;
  let user_name = auth.as_ref().map(|a| a.user.name.as_str());
  content::render_landing(catalog.courses(), user_name)
    .map(Html)
    .map_err(|e| ApiError::Internal(format!("landing template: {}", e)))
}

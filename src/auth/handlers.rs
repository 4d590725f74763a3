//! Authentication handlers for login, logout and the current user.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use std::time::Duration;

use super::middleware::{AuthContext, SESSION_COOKIE_NAME};
use crate::domain::User;
use crate::error::{ApiError, LogOnError};
use crate::handlers::JsonBody;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /login - Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<User>), ApiError> {
    if state.config.login_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.login_delay_ms)).await;
    }

    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".into()));
    }

    let user = state
        .read_catalog()?
        .find_user_by_email(email)
        .cloned()
        .ok_or(ApiError::InvalidCredentials)?;

    if !state.credentials()?.verify(&user.id, &req.password) {
        tracing::info!("Failed login for {}", email);
        return Err(ApiError::InvalidCredentials);
    }

    let session_id = state.sessions()?.create(&user.id);
    state
        .slot
        .save(&session_id, &user)
        .log_warn("Failed to save session slot");
    tracing::info!("{} {} logged in", user.role, user.email);

    let session_cookie = Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::hours(state.config.session_expiry_hours))
        .build();

    Ok((jar.add(session_cookie), Json(user)))
}

/// POST /logout - End the session, drop the cookie and clear the slot
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE_NAME) {
        let session_id = session_cookie.value();
        if let Some(mut sessions) = state.sessions().log_warn("Failed to end session") {
            sessions.remove(session_id);
        }
        if state
            .slot
            .load()
            .is_some_and(|stored| stored.session_id == session_id)
        {
            state.slot.clear().log_warn("Failed to clear session slot");
        }
    }

    let session_cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.remove(session_cookie), StatusCode::NO_CONTENT)
}

/// GET /me - The logged-in user
pub async fn me(auth: AuthContext) -> Json<User> {
    Json(auth.user)
}

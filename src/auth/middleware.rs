//! Authentication extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::domain::User;
use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "agora_session";

/// Authenticated request context.
/// Add this as a handler parameter to require a logged-in user.
///
/// The user record is read fresh from the catalog on every request, so
/// grant and gate changes apply immediately.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session_id: String,
    pub user: User,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthenticated)?;

        let session_id = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthenticated)?;

        let user_id = state
            .sessions()?
            .touch(&session_id)
            .ok_or(ApiError::Unauthenticated)?;

        let user = state.read_catalog()?.user(&user_id).cloned();
        match user {
            Some(user) => Ok(AuthContext { session_id, user }),
            None => {
                // Account was deleted while logged in
                state.sessions()?.remove(&session_id);
                Err(ApiError::Unauthenticated)
            }
        }
    }
}

/// Optional authentication extractor.
/// Returns Some(AuthContext) if authenticated, None otherwise.
/// Use for pages that work both with and without authentication.
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthContext::from_request_parts(parts, state).await {
            Ok(auth) => Ok(OptionalAuth(Some(auth))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

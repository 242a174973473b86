//! Request extractors for bearer-token sessions.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use promptlib_core::{Session, SessionToken};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// The raw session token from `Authorization: Bearer <token>`.
pub struct BearerToken(pub SessionToken);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        Ok(BearerToken(SessionToken::from_string(token)))
    }
}

/// A signed-in user with a local user id.
///
/// Sessions without a user id are treated as unauthenticated.
pub struct CurrentUser {
    pub user_id: String,
    pub session: Session,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let session = state
            .identity
            .session(&token)
            .ok_or(ApiError::Unauthorized)?;

        match session.user_id.clone() {
            Some(user_id) => Ok(CurrentUser { user_id, session }),
            None => {
                debug!(email = ?session.email, "Session has no user id");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

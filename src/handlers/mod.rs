pub mod auth;
pub mod fallback;
pub mod health;
pub mod plans;
pub mod points;
pub mod purchase;
pub mod servers;

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::session::Session;
use crate::utils::auth::bearer_token;

/// Resolve the gateway session behind a request's bearer token
///
/// Protected routes fail with 401 here, which sends the client back to
/// sign-in.
pub(crate) fn require_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<Session>, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::NotSignedIn)?;
    state.sessions.get(token).ok_or(AuthError::NotSignedIn)
}

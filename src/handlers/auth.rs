use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::api::SuccessResponse;
use crate::models::user::User;
use crate::utils::auth::bearer_token;

#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailSignInRequest {
    pub email: String,
    pub password: String,
}

/// OAuth redirect tokens as delivered to the client in the provider's
/// redirect fragment
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: User,
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: Option<User>,
    pub points: Option<i64>,
}

/// GET /auth/signin
///
/// Redirects the browser to the external OAuth authorization step.
pub async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SignInQuery>,
) -> Redirect {
    let url = state
        .session_controller
        .authorize_redirect(params.provider.as_deref());
    Redirect::to(&url)
}

/// POST /auth/signin/email
pub async fn email_sign_in_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmailSignInRequest>,
) -> Result<Response, AuthError> {
    let signed_in = state
        .session_controller
        .sign_in_with_password(&request.email, &request.password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SignInResponse {
            token: signed_in.token,
            user: signed_in.user,
            points: signed_in.points,
        }),
    )
        .into_response())
}

/// POST /auth/callback
///
/// Exchanges the tokens from the provider redirect for a gateway session.
pub async fn callback_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallbackRequest>,
) -> Result<Response, AuthError> {
    let signed_in = state
        .session_controller
        .complete_oauth(&request.access_token, &request.refresh_token)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SignInResponse {
            token: signed_in.token,
            user: signed_in.user,
            points: signed_in.points,
        }),
    )
        .into_response())
}

/// GET /auth/session
///
/// Restores the caller's session. `user: null` means the account exists but
/// is not fully onboarded yet (no profile row).
pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let token = bearer_token(&headers).ok_or(AuthError::NotSignedIn)?;

    let restored = state.session_controller.restore(token).await?;
    let (user, points) = match restored {
        Some((user, points)) => (Some(user), Some(points)),
        None => (None, None),
    };

    Ok((StatusCode::OK, Json(SessionResponse { user, points })).into_response())
}

/// POST /auth/signout
///
/// Idempotent: signing out twice, or without a session, still succeeds.
pub async fn sign_out_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = bearer_token(&headers) {
        state.session_controller.sign_out(token);
    }

    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Signed out".to_string(),
        }),
    )
        .into_response()
}

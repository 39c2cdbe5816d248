use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::core::error::PointsError;
use crate::core::state::AppState;
use crate::handlers::require_session;

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: i64,
    /// Seconds until the next claim is allowed; 0 when idle
    pub cooldown_remaining: i64,
}

/// GET /points
///
/// Current balance plus derived cooldown state. A backend fetch failure
/// degrades to a zero state rather than failing the view; the next
/// navigation retries.
pub async fn points_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, PointsError> {
    let session = require_session(&state, &headers)?;

    let response = match state
        .points
        .balance(&session.user.id, &session.access_token)
        .await
    {
        Ok((balance, cooldown)) => PointsResponse {
            points: balance.points,
            cooldown_remaining: cooldown.remaining(),
        },
        Err(PointsError::DataLoad(e)) => {
            warn!(user_id = %session.user.id, error = %e, "Failed to load points balance");
            PointsResponse {
                points: 0,
                cooldown_remaining: 0,
            }
        }
        Err(other) => return Err(other),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// POST /points/claim
pub async fn claim_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, PointsError> {
    let session = require_session(&state, &headers)?;

    let balance = state
        .points
        .claim(&session.user.id, &session.access_token)
        .await?;

    Ok((
        StatusCode::OK,
        Json(PointsResponse {
            points: balance.points,
            cooldown_remaining: state.config.points.claim_cooldown_secs,
        }),
    )
        .into_response())
}

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::handlers::require_session;
use crate::models::server::ServerInstance;

#[derive(Debug, Serialize)]
pub struct ServersResponse {
    pub servers: Vec<ServerInstance>,
}

/// GET /servers
///
/// The caller's provisioned instances, newest first. A backend fetch
/// failure degrades to an empty list; the next navigation retries.
pub async fn servers_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let session = require_session(&state, &headers)?;

    let servers = match state
        .inventory
        .list(&session.user.id, &session.access_token)
        .await
    {
        Ok(servers) => servers,
        Err(e) => {
            warn!(user_id = %session.user.id, error = %e, "Failed to load server list");
            Vec::new()
        }
    };

    Ok((StatusCode::OK, Json(ServersResponse { servers })).into_response())
}

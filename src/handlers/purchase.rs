use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::error::PurchaseError;
use crate::core::state::AppState;
use crate::handlers::require_session;
use crate::models::plan::ServerType;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub server_type: ServerType,
    pub plan_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub success: bool,
    /// Id of the newly provisioned instance
    pub server_id: String,
    /// Balance re-synced from the backend after the purchase
    pub points: Option<i64>,
}

/// POST /purchase
pub async fn purchase_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<PurchaseRequest>,
) -> Result<Response, PurchaseError> {
    let session = require_session(&state, &headers)?;

    let receipt = state
        .purchase
        .purchase(
            &session.user.id,
            request.server_type,
            &request.plan_name,
            &session.access_token,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(PurchaseResponse {
            success: true,
            server_id: receipt.server_id,
            points: receipt.points,
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{bearer_headers, seed_session, spawn_backend, test_state};
    use axum::body::Body;
    use axum::routing::{get, post};
    use axum::Router;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn profile_json(points: i64) -> serde_json::Value {
        serde_json::json!([{
            "id": "uid-1",
            "username": "steve",
            "avatar": null,
            "discord_id": null,
            "points": points,
            "last_point_update": null
        }])
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let (_, body) = response.into_parts();
        let bytes = Body::new(body).collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_purchase_requires_session() {
        let state = test_state("https://example.supabase.co".to_string());

        let result = purchase_handler(
            State(state),
            HeaderMap::new(),
            Json(PurchaseRequest {
                server_type: ServerType::Bot,
                plan_name: "Starter".to_string(),
            }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_purchase_success_returns_id_and_balance() {
        let fetches = Arc::new(AtomicI64::new(0));

        let router = Router::new()
            .route(
                "/rest/v1/profiles",
                get(move || {
                    let fetches = Arc::clone(&fetches);
                    async move {
                        let n = fetches.fetch_add(1, Ordering::SeqCst);
                        Json(profile_json(if n == 0 { 20_000 } else { 0 }))
                    }
                }),
            )
            .route(
                "/rest/v1/rpc/purchase_server",
                post(|| async { Json(serde_json::json!("srv-new-1")) }),
            );
        let base = spawn_backend(router).await;
        let state = test_state(base);
        let token = seed_session(&state, "uid-1");

        let response = purchase_handler(
            State(state),
            bearer_headers(&token),
            Json(PurchaseRequest {
                server_type: ServerType::Bot,
                plan_name: "Starter".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["server_id"], "srv-new-1");
        assert_eq!(body["points"], 0);
    }

    #[tokio::test]
    async fn test_purchase_insufficient_points_is_409() {
        let router = Router::new().route(
            "/rest/v1/profiles",
            get(|| async { Json(profile_json(14_000)) }),
        );
        let base = spawn_backend(router).await;
        let state = test_state(base);
        let token = seed_session(&state, "uid-1");

        let result = purchase_handler(
            State(state),
            bearer_headers(&token),
            Json(PurchaseRequest {
                server_type: ServerType::Minecraft,
                plan_name: "3GB Plan".to_string(),
            }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("15000"));
    }

    #[tokio::test]
    async fn test_purchase_backend_rejection_carries_resynced_balance() {
        let router = Router::new()
            .route(
                "/rest/v1/profiles",
                get(|| async { Json(profile_json(20_000)) }),
            )
            .route(
                "/rest/v1/rpc/purchase_server",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({ "message": "Insufficient points" })),
                    )
                }),
            );
        let base = spawn_backend(router).await;
        let state = test_state(base);
        let token = seed_session(&state, "uid-1");

        let result = purchase_handler(
            State(state),
            bearer_headers(&token),
            Json(PurchaseRequest {
                server_type: ServerType::Bot,
                plan_name: "Starter".to_string(),
            }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["points"], 20_000);
    }
}

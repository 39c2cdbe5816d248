use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::models::api::ErrorResponse;

pub async fn fallback_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "Unknown endpoint. Valid endpoints: /auth/*, /points, /plans, /servers, /purchase, /health".to_string(),
        )),
    )
        .into_response()
}

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::models::plan::{Plan, BOT_PLANS, MINECRAFT_PLANS};

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub minecraft: &'static [Plan],
    pub bot: &'static [Plan],
}

/// GET /plans
///
/// The static catalogs. No session required: the storefront shows plans to
/// signed-out visitors too.
pub async fn plans_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(PlansResponse {
            minecraft: MINECRAFT_PLANS,
            bot: BOT_PLANS,
        }),
    )
}

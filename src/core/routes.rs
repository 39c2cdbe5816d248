// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth flow
        .route("/auth/signin", get(crate::handlers::auth::sign_in_handler))
        .route("/auth/signin/email", post(crate::handlers::auth::email_sign_in_handler))
        .route("/auth/callback", post(crate::handlers::auth::callback_handler))
        .route("/auth/session", get(crate::handlers::auth::session_handler))
        .route("/auth/signout", post(crate::handlers::auth::sign_out_handler))

        // Points ledger
        .route("/points", get(crate::handlers::points::points_handler))
        .route("/points/claim", post(crate::handlers::points::claim_handler))

        // Storefront
        .route("/plans", get(crate::handlers::plans::plans_handler))
        .route("/servers", get(crate::handlers::servers::servers_handler))
        .route("/purchase", post(crate::handlers::purchase::purchase_handler))

        // Liveness
        .route("/health", get(crate::handlers::health::health_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}

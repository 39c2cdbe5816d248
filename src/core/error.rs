// Centralized error handling for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::api::ErrorResponse;

/// Errors raised while loading data from the hosted backend
///
/// Never fatal: handlers degrade to an empty/zero state or let the user
/// retry on the next navigation.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DataLoadError {
    fn from(err: reqwest::Error) -> Self {
        DataLoadError::Request(err.to_string())
    }
}

impl IntoResponse for DataLoadError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response()
    }
}

/// Errors that can occur during sign-in, session restore, or sign-out
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Authorization tokens are absent or malformed")]
    MissingTokens,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Account not fully onboarded yet")]
    NotOnboarded,

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Provider(_) => StatusCode::UNAUTHORIZED,
            AuthError::MissingTokens => StatusCode::BAD_REQUEST,
            AuthError::NotSignedIn => StatusCode::UNAUTHORIZED,
            AuthError::NotOnboarded => StatusCode::FORBIDDEN,
            AuthError::DataLoad(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Errors that can occur during the point-claim operation
#[derive(Error, Debug)]
pub enum PointsError {
    #[error("Claim is cooling down, {remaining}s remaining")]
    Cooldown { remaining: i64 },

    #[error("Account not fully onboarded yet")]
    NotOnboarded,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
}

impl IntoResponse for PointsError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, retry_after) = match self {
            PointsError::Auth(err) => return err.into_response(),
            PointsError::Cooldown { remaining } => (StatusCode::TOO_MANY_REQUESTS, Some(remaining)),
            PointsError::NotOnboarded => (StatusCode::FORBIDDEN, None),
            PointsError::DataLoad(_) => (StatusCode::BAD_GATEWAY, None),
        };

        let mut body = ErrorResponse::new(message);
        body.retry_after = retry_after;

        (status, Json(body)).into_response()
    }
}

/// Errors that can occur during a plan purchase
#[derive(Error, Debug)]
pub enum PurchaseError {
    // Unknown plan names are not reachable through the catalog UI
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Insufficient points: plan costs {required}, balance is {available}")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("Purchase rejected by backend: {message}")]
    Rejected {
        message: String,
        /// Balance re-synced after the rejection, when the re-fetch succeeded
        points: Option<i64>,
    },

    #[error("Account not fully onboarded yet")]
    NotOnboarded,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
}

impl IntoResponse for PurchaseError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, points) = match self {
            PurchaseError::Auth(err) => return err.into_response(),
            PurchaseError::UnknownPlan(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            PurchaseError::InsufficientPoints { .. } => (StatusCode::CONFLICT, None),
            PurchaseError::Rejected { points, .. } => (StatusCode::CONFLICT, points),
            PurchaseError::NotOnboarded => (StatusCode::FORBIDDEN, None),
            PurchaseError::DataLoad(_) => (StatusCode::BAD_GATEWAY, None),
        };

        let mut body = ErrorResponse::new(message);
        body.points = points;

        (status, Json(body)).into_response()
    }
}

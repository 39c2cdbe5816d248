pub mod auth;
pub mod inventory;
pub mod profiles;

use crate::core::error::DataLoadError;
use serde::Deserialize;

/// Error body shape returned by the backend (PostgREST and auth API)
#[derive(Debug, Deserialize, Default)]
struct BackendErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Convert a non-success backend response into a `DataLoadError`, pulling
/// the human-readable message out of whichever field the backend used.
pub(crate) async fn error_from_response(response: reqwest::Response) -> DataLoadError {
    let status = response.status().as_u16();

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BackendErrorBody>(&text)
        .ok()
        .and_then(|body| body.message.or(body.msg).or(body.error_description))
        .unwrap_or(text);

    DataLoadError::Status { status, message }
}

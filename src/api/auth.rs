use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::error_from_response;
use crate::core::error::DataLoadError;

/// Client for the hosted backend's auth API (identity provider adapter)
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

/// Authenticated principal as reported by the auth API
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPrincipal {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of the password-grant token exchange
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthPrincipal,
}

#[derive(Serialize)]
struct AuthorizeQuery<'a> {
    provider: &'a str,
    redirect_to: &'a str,
    scopes: &'a str,
}

impl AuthClient {
    pub fn new(base_url: String, anon_key: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            anon_key,
        })
    }

    /// Build the provider authorize URL the browser is redirected to
    ///
    /// No network call: the provider handles the rest of the OAuth dance and
    /// returns tokens in the redirect fragment.
    pub fn authorize_url(&self, provider: &str, redirect_to: &str, scopes: &str) -> String {
        let query = serde_urlencoded::to_string(AuthorizeQuery {
            provider,
            redirect_to,
            scopes,
        })
        .unwrap_or_default();

        format!("{}/auth/v1/authorize?{}", self.base_url, query)
    }

    /// Exchange email/password credentials for a backend session
    pub async fn password_grant(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, DataLoadError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| DataLoadError::Decode(e.to_string()))
    }

    /// Fetch the principal behind an access token
    pub async fn get_user(&self, access_token: &str) -> Result<AuthPrincipal, DataLoadError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<AuthPrincipal>()
            .await
            .map_err(|e| DataLoadError::Decode(e.to_string()))
    }

    /// Startup probe against the auth API health endpoint
    pub async fn health(&self) -> Result<(), DataLoadError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/health", self.base_url))
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_authorize_url_encodes_query() {
        let client = AuthClient::new(
            "https://example.supabase.co".to_string(),
            "anon".to_string(),
            30,
        )
        .unwrap();

        let url = client.authorize_url("discord", "https://welder.host/auth", "identify email");

        assert!(url.starts_with("https://example.supabase.co/auth/v1/authorize?"));
        assert!(url.contains("provider=discord"));
        assert!(url.contains("redirect_to=https%3A%2F%2Fwelder.host%2Fauth"));
        assert!(url.contains("scopes=identify+email"));
    }

    #[tokio::test]
    async fn test_password_grant_success() {
        let router = Router::new().route(
            "/auth/v1/token",
            post(|| async {
                Json(serde_json::json!({
                    "access_token": "at-1",
                    "refresh_token": "rt-1",
                    "user": { "id": "uid-1", "email": "user@example.com" }
                }))
            }),
        );
        let base = spawn_backend(router).await;

        let client = AuthClient::new(base, "anon".to_string(), 5).unwrap();
        let tokens = client
            .password_grant("user@example.com", "hunter2")
            .await
            .unwrap();

        assert_eq!(tokens.access_token, "at-1");
        assert_eq!(tokens.user.id, "uid-1");
    }

    #[tokio::test]
    async fn test_password_grant_bad_credentials() {
        let router = Router::new().route(
            "/auth/v1/token",
            post(|| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error_description": "Invalid login credentials" })),
                )
            }),
        );
        let base = spawn_backend(router).await;

        let client = AuthClient::new(base, "anon".to_string(), 5).unwrap();
        let err = client
            .password_grant("user@example.com", "wrong")
            .await
            .unwrap_err();

        match err {
            DataLoadError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let router = Router::new().route(
            "/auth/v1/user",
            get(|| async {
                Json(serde_json::json!({ "id": "uid-9", "email": "nine@example.com" }))
            }),
        );
        let base = spawn_backend(router).await;

        let client = AuthClient::new(base, "anon".to_string(), 5).unwrap();
        let principal = client.get_user("some-token").await.unwrap();

        assert_eq!(principal.id, "uid-9");
        assert_eq!(principal.email.as_deref(), Some("nine@example.com"));
    }

    #[tokio::test]
    async fn test_health_probe() {
        let router = Router::new().route("/auth/v1/health", get(|| async { "{}" }));
        let base = spawn_backend(router).await;

        let client = AuthClient::new(base, "anon".to_string(), 5).unwrap();
        assert!(client.health().await.is_ok());
    }
}

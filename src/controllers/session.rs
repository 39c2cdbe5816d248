use std::sync::Arc;
use tracing::info;

use crate::api::auth::{AuthClient, AuthPrincipal};
use crate::api::profiles::ProfileStore;
use crate::core::config::BackendConfig;
use crate::core::error::{AuthError, DataLoadError};
use crate::models::profile::ProfileRow;
use crate::models::session::Session;
use crate::models::user::User;
use crate::stores::session_store::SessionStore;
use crate::utils::auth::generate_session_token;
use crate::utils::time::current_timestamp;

/// Result of a successful sign-in: the minted gateway token, the user, and
/// the freshly loaded points balance (dependent views stay consistent)
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub user: User,
    pub points: i64,
}

/// Orchestrates sign-in, session restoration and sign-out
pub struct SessionController {
    auth: Arc<AuthClient>,
    profiles: Arc<ProfileStore>,
    sessions: Arc<SessionStore>,
    oauth_provider: String,
    oauth_redirect_url: String,
    oauth_scopes: String,
}

impl SessionController {
    pub fn new(
        auth: Arc<AuthClient>,
        profiles: Arc<ProfileStore>,
        sessions: Arc<SessionStore>,
        backend: &BackendConfig,
    ) -> Self {
        Self {
            auth,
            profiles,
            sessions,
            oauth_provider: backend.oauth_provider.clone(),
            oauth_redirect_url: backend.oauth_redirect_url.clone(),
            oauth_scopes: backend.oauth_scopes.clone(),
        }
    }

    /// URL of the external OAuth authorization step
    pub fn authorize_redirect(&self, provider: Option<&str>) -> String {
        self.auth.authorize_url(
            provider.unwrap_or(&self.oauth_provider),
            &self.oauth_redirect_url,
            &self.oauth_scopes,
        )
    }

    /// Email/password sign-in via the backend token exchange
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, AuthError> {
        let tokens = self
            .auth
            .password_grant(email, password)
            .await
            .map_err(provider_error)?;

        self.establish(tokens.user, tokens.access_token).await
    }

    /// Complete an OAuth sign-in from the tokens the provider redirect
    /// delivered to the client
    pub async fn complete_oauth(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<SignedIn, AuthError> {
        if access_token.is_empty() || refresh_token.is_empty() {
            return Err(AuthError::MissingTokens);
        }

        let principal = self
            .auth
            .get_user(access_token)
            .await
            .map_err(provider_error)?;

        self.establish(principal, access_token.to_string()).await
    }

    /// Restore an existing session
    ///
    /// Re-fetches the profile so the value reflects the backend; yields
    /// `None` when the profile row does not exist yet (not fully onboarded).
    /// Idempotent against an unchanged backend.
    pub async fn restore(&self, token: &str) -> Result<Option<(User, i64)>, AuthError> {
        let session = self.sessions.get(token).ok_or(AuthError::NotSignedIn)?;

        let Some(row) = self
            .profiles
            .fetch(&session.user.id, &session.access_token)
            .await?
        else {
            return Ok(None);
        };

        let points = row.points;
        let user = build_user(&session.user.id, &session.user.email, row);
        Ok(Some((user, points)))
    }

    /// Clear the gateway session; idempotent
    pub fn sign_out(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            info!("Session signed out");
        }
    }

    /// Mint a gateway session for an authenticated principal
    ///
    /// The profile row is loaded as part of sign-in so the points balance is
    /// immediately available to dependent views. A missing row means the
    /// backend onboarding trigger has not created the profile yet.
    async fn establish(
        &self,
        principal: AuthPrincipal,
        access_token: String,
    ) -> Result<SignedIn, AuthError> {
        let row = self
            .profiles
            .fetch(&principal.id, &access_token)
            .await?
            .ok_or(AuthError::NotOnboarded)?;

        let points = row.points;
        let email = principal.email.clone().unwrap_or_default();
        let user = build_user(&principal.id, &email, row);

        let token = generate_session_token();
        self.sessions.add(Session::new(
            token.clone(),
            user.clone(),
            access_token,
            current_timestamp(),
        ));

        info!(
            user_id = %user.id,
            username = %user.username,
            points,
            "User signed in"
        );

        Ok(SignedIn {
            token,
            user,
            points,
        })
    }
}

fn build_user(id: &str, email: &str, row: ProfileRow) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        username: row.username,
        avatar: row.avatar,
        discord_id: row.discord_id,
    }
}

// Client-visible auth failures (4xx) are provider errors the user can retry;
// everything else is a backend data-load failure.
fn provider_error(err: DataLoadError) -> AuthError {
    match err {
        DataLoadError::Status { status, message } if (400..500).contains(&status) => {
            AuthError::Provider(message)
        }
        other => AuthError::DataLoad(other),
    }
}

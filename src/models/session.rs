use crate::models::user::User;

/// Gateway-local authenticated session
///
/// Holds the backend access token used for per-user backend calls. Sessions
/// live in memory only; the backend session is the durable one.
#[derive(Clone, Debug)]
pub struct Session {
    /// Opaque gateway token handed to the client
    pub token: String,
    pub user: User,
    /// Backend access token (bearer) for this user
    pub access_token: String,
    /// Unix timestamp of session creation, used by the TTL sweeper
    pub created_at: i64,
}

impl Session {
    pub fn new(token: String, user: User, access_token: String, created_at: i64) -> Self {
        Self {
            token,
            user,
            access_token,
            created_at,
        }
    }
}

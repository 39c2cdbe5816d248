use serde::{Deserialize, Serialize};

/// Authenticated storefront user
///
/// Identity (`id`, `email`) comes from the auth principal; `username`,
/// `avatar` and `discord_id` come from the profile row. `discord_id` is
/// present only for provider-linked accounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user ID (UUID), immutable for the account's lifetime
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
}

impl User {
    pub fn new(id: String, email: String, username: String) -> Self {
        Self {
            id,
            email,
            username,
            avatar: None,
            discord_id: None,
        }
    }
}

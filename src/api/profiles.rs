use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::api::error_from_response;
use crate::core::error::DataLoadError;
use crate::models::profile::ProfileRow;

const PROFILE_COLUMNS: &str = "id,username,avatar,discord_id,points,last_point_update";

/// Client for the backend `profiles` table (points balance and metadata)
pub struct ProfileStore {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl ProfileStore {
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

    /// Fetch a user's profile row, `None` when no row exists yet
    pub async fn fetch(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Option<ProfileRow>, DataLoadError> {
        let response = self
            .client
            .get(format!("{}/rest/v1/profiles", self.base_url))
            .query(&[
                ("id", format!("eq.{user_id}")),
                ("select", PROFILE_COLUMNS.to_string()),
            ])
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mut rows = response
            .json::<Vec<ProfileRow>>()
            .await
            .map_err(|e| DataLoadError::Decode(e.to_string()))?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    /// Conditionally award one point
    ///
    /// The update is filtered on the previously observed `points` value, so
    /// the write only lands if no concurrent claim got there first. Returns
    /// the updated row, or `None` when the condition matched no rows (a
    /// concurrent writer won).
    pub async fn conditional_increment(
        &self,
        user_id: &str,
        expected_points: i64,
        now: DateTime<Utc>,
        access_token: &str,
    ) -> Result<Option<ProfileRow>, DataLoadError> {
        let response = self
            .client
            .patch(format!("{}/rest/v1/profiles", self.base_url))
            .query(&[
                ("id", format!("eq.{user_id}")),
                ("points", format!("eq.{expected_points}")),
            ])
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(access_token)
            .json(&serde_json::json!({
                "points": expected_points + 1,
                "last_point_update": now.to_rfc3339(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mut rows = response
            .json::<Vec<ProfileRow>>()
            .await
            .map_err(|e| DataLoadError::Decode(e.to_string()))?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }
}

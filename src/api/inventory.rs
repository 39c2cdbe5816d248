use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

use crate::api::error_from_response;
use crate::core::error::DataLoadError;
use crate::models::plan::{Plan, ServerType};
use crate::models::server::ServerInstance;

/// Client for the backend `servers` table and the purchase procedure
pub struct InventoryClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

/// Argument shape of the `purchase_server` remote procedure
#[derive(Debug, Serialize)]
struct PurchaseArgs<'a> {
    p_server_type: &'a str,
    p_plan_name: &'a str,
    p_ram: &'a str,
    p_cpu: &'a str,
    p_disk: &'a str,
    p_max_players: String,
    p_cost_points: i64,
}

impl InventoryClient {
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

    /// List a user's provisioned instances, newest first
    pub async fn list(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Vec<ServerInstance>, DataLoadError> {
        let response = self
            .client
            .get(format!("{}/rest/v1/servers", self.base_url))
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ])
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<Vec<ServerInstance>>()
            .await
            .map_err(|e| DataLoadError::Decode(e.to_string()))
    }

    /// Invoke the backend purchase procedure
    ///
    /// The procedure validates the balance server-side, debits points and
    /// creates the instance row atomically; this client never mutates the
    /// balance itself. Returns the new instance id.
    pub async fn purchase(
        &self,
        server_type: ServerType,
        plan: &Plan,
        access_token: &str,
    ) -> Result<String, DataLoadError> {
        let args = PurchaseArgs {
            p_server_type: server_type.as_str(),
            p_plan_name: plan.name,
            p_ram: plan.ram,
            p_cpu: plan.cpu,
            p_disk: plan.disk,
            p_max_players: plan
                .max_players
                .map(|n| n.to_string())
                .unwrap_or_default(),
            p_cost_points: plan.cost_points,
        };

        let response = self
            .client
            .post(format!("{}/rest/v1/rpc/purchase_server", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&args)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<String>()
            .await
            .map_err(|e| DataLoadError::Decode(e.to_string()))
    }
}

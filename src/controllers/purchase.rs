use std::sync::Arc;
use tracing::{info, warn};

use crate::api::inventory::InventoryClient;
use crate::api::profiles::ProfileStore;
use crate::core::error::{DataLoadError, PurchaseError};
use crate::models::plan::{find_plan, ServerType};

/// Outcome of a committed purchase: the new instance id and the balance as
/// re-synced from the backend afterwards
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub server_id: String,
    pub points: Option<i64>,
}

/// Validates affordability against the static catalog and invokes the
/// backend purchase procedure
///
/// The procedure is the sole authority for debiting points and creating the
/// instance row; this controller performs no local balance mutation, and
/// re-fetches the balance after every call so the client never trusts its
/// own pre-check.
pub struct PurchaseController {
    profiles: Arc<ProfileStore>,
    inventory: Arc<InventoryClient>,
}

impl PurchaseController {
    pub fn new(profiles: Arc<ProfileStore>, inventory: Arc<InventoryClient>) -> Self {
        Self {
            profiles,
            inventory,
        }
    }

    pub async fn purchase(
        &self,
        user_id: &str,
        server_type: ServerType,
        plan_name: &str,
        access_token: &str,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        // Plan lookup is by exact name; an unknown name cannot come from the
        // catalog UI, so fail fast.
        let plan = find_plan(server_type, plan_name)
            .ok_or_else(|| PurchaseError::UnknownPlan(plan_name.to_string()))?;

        let row = self
            .profiles
            .fetch(user_id, access_token)
            .await?
            .ok_or(PurchaseError::NotOnboarded)?;

        if plan.cost_points > row.points {
            // No network call is made for an unaffordable plan
            return Err(PurchaseError::InsufficientPoints {
                required: plan.cost_points,
                available: row.points,
            });
        }

        match self.inventory.purchase(server_type, plan, access_token).await {
            Ok(server_id) => {
                let points = self.resync_balance(user_id, access_token).await;
                info!(
                    user_id = %user_id,
                    server_id = %server_id,
                    plan = %plan.name,
                    cost_points = plan.cost_points,
                    balance = ?points,
                    "Purchase committed"
                );
                Ok(PurchaseReceipt { server_id, points })
            }
            // The backend rejected a seemingly-valid purchase (balance moved
            // concurrently, validation failed); re-sync before surfacing.
            Err(DataLoadError::Status { status, message }) if (400..500).contains(&status) => {
                let points = self.resync_balance(user_id, access_token).await;
                Err(PurchaseError::Rejected { message, points })
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn resync_balance(&self, user_id: &str, access_token: &str) -> Option<i64> {
        match self.profiles.fetch(user_id, access_token).await {
            Ok(row) => row.map(|r| r.points),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to re-sync balance after purchase");
                None
            }
        }
    }
}

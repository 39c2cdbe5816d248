use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::profiles::ProfileStore;
use crate::core::error::PointsError;
use crate::models::profile::PointsBalance;

/// Claim cooldown state, derived from the persisted `last_point_update`
///
/// Deriving from the stored timestamp (rather than a local timer) means a
/// restart or a second tab recomputes the remaining wait instead of
/// resetting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownState {
    Idle,
    CooldownActive { remaining: i64 },
}

impl CooldownState {
    pub fn from_last_update(
        last_update: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        window_secs: i64,
    ) -> Self {
        let Some(last) = last_update else {
            return CooldownState::Idle;
        };

        let elapsed = (now - last).num_seconds();
        if elapsed >= window_secs {
            CooldownState::Idle
        } else {
            CooldownState::CooldownActive {
                remaining: window_secs - elapsed.max(0),
            }
        }
    }

    pub fn remaining(&self) -> i64 {
        match self {
            CooldownState::Idle => 0,
            CooldownState::CooldownActive { remaining } => *remaining,
        }
    }
}

/// Enforces the claim cooldown and awards points
pub struct PointsLedger {
    profiles: Arc<ProfileStore>,
    cooldown_secs: i64,
}

impl PointsLedger {
    pub fn new(profiles: Arc<ProfileStore>, cooldown_secs: i64) -> Self {
        Self {
            profiles,
            cooldown_secs,
        }
    }

    /// Current balance plus derived cooldown state
    pub async fn balance(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<(PointsBalance, CooldownState), PointsError> {
        let row = self
            .profiles
            .fetch(user_id, access_token)
            .await?
            .ok_or(PointsError::NotOnboarded)?;

        let state =
            CooldownState::from_last_update(row.last_point_update, Utc::now(), self.cooldown_secs);

        Ok((row.into(), state))
    }

    /// Claim exactly one point
    ///
    /// Allowed only while idle. The balance write is conditioned on the
    /// previously observed value, so a double-click racing itself cannot
    /// double-increment: the first writer wins and the loser fails with a
    /// cooldown error.
    pub async fn claim(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<PointsBalance, PointsError> {
        let row = self
            .profiles
            .fetch(user_id, access_token)
            .await?
            .ok_or(PointsError::NotOnboarded)?;

        let now = Utc::now();
        let state = CooldownState::from_last_update(row.last_point_update, now, self.cooldown_secs);
        if let CooldownState::CooldownActive { remaining } = state {
            return Err(PointsError::Cooldown { remaining });
        }

        let updated = self
            .profiles
            .conditional_increment(user_id, row.points, now, access_token)
            .await?;

        match updated {
            Some(updated_row) => {
                info!(
                    user_id = %user_id,
                    points = updated_row.points,
                    "Point claimed"
                );
                Ok(updated_row.into())
            }
            // Zero rows matched: a concurrent claim got there first
            None => Err(PointsError::Cooldown {
                remaining: self.cooldown_secs,
            }),
        }
    }
}

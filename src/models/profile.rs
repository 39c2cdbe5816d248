use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row shape of the backend `profiles` table
///
/// One row per user. `points` is mutated only by the claim operation
/// (conditional +1) or by the backend purchase procedure (debit); it never
/// goes negative.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub discord_id: Option<String>,
    pub points: i64,
    #[serde(default)]
    pub last_point_update: Option<DateTime<Utc>>,
}

/// Points balance view returned to clients
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointsBalance {
    pub user_id: String,
    pub points: i64,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

impl From<ProfileRow> for PointsBalance {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.id,
            points: row.points,
            last_update: row.last_point_update,
        }
    }
}

use crate::models::plan::ServerType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a provisioned instance
///
/// Transitions (active -> suspended -> expired) are owned entirely by the
/// backend; this service never mutates status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Active,
    Suspended,
    Expired,
}

/// Row shape of the backend `servers` table
///
/// Created exactly once per successful purchase, by the backend purchase
/// procedure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerInstance {
    pub id: String,
    pub user_id: String,
    pub server_type: ServerType,
    pub plan_name: String,
    pub ram: String,
    pub cpu: String,
    pub disk: String,
    #[serde(default)]
    pub max_players: Option<String>,
    pub cost_points: i64,
    #[serde(default = "default_status", deserialize_with = "status_or_active")]
    pub status: ServerStatus,
    #[serde(default)]
    pub console_email: Option<String>,
    #[serde(default)]
    pub console_password: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_status() -> ServerStatus {
    ServerStatus::Active
}

// The backend column is nullable; a null status means the row was just
// inserted and defaults to active.
fn status_or_active<'de, D>(deserializer: D) -> Result<ServerStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<ServerStatus>::deserialize(deserializer)?.unwrap_or(ServerStatus::Active))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_row() {
        let json = r#"{
            "id": "f3b1c2d4-0000-0000-0000-000000000001",
            "user_id": "a1b2c3d4-0000-0000-0000-000000000002",
            "server_type": "bot",
            "plan_name": "Starter",
            "ram": "256MB",
            "cpu": "20%",
            "disk": "1GB",
            "max_players": null,
            "cost_points": 20000,
            "status": "active",
            "console_email": "discord+42@welder.host",
            "console_password": "s3cret",
            "expires_at": "2026-10-01T00:00:00+00:00",
            "created_at": "2026-09-01T12:30:00.123456+00:00"
        }"#;

        let row: ServerInstance = serde_json::from_str(json).unwrap();
        assert_eq!(row.server_type, ServerType::Bot);
        assert_eq!(row.status, ServerStatus::Active);
        assert_eq!(row.cost_points, 20_000);
        assert!(row.max_players.is_none());
        assert!(row.created_at.is_some());
    }

    #[test]
    fn test_status_defaults_to_active_when_null() {
        let json = r#"{
            "id": "x",
            "user_id": "y",
            "server_type": "minecraft",
            "plan_name": "2GB Plan",
            "ram": "2GB",
            "cpu": "100%",
            "disk": "5GB",
            "cost_points": 0,
            "status": null,
            "expires_at": "2026-10-01T00:00:00Z"
        }"#;

        let row: ServerInstance = serde_json::from_str(json).unwrap();
        assert_eq!(row.status, ServerStatus::Active);
    }
}

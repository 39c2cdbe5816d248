use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of hosting instance a plan provisions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    Minecraft,
    Bot,
}

impl ServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerType::Minecraft => "minecraft",
            ServerType::Bot => "bot",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed hosting tier with resource allocations and a points price
///
/// Plans are defined at build time; the backend purchase procedure receives
/// the resolved values, never a free-form plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub name: &'static str,
    pub ram: &'static str,
    pub cpu: &'static str,
    pub disk: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,
    pub cost_points: i64,
}

pub const MINECRAFT_PLANS: &[Plan] = &[
    Plan { name: "2GB Plan", ram: "2GB", cpu: "100%", disk: "5GB", max_players: Some(20), cost_points: 0 },
    Plan { name: "3GB Plan", ram: "3GB", cpu: "150%", disk: "10GB", max_players: Some(40), cost_points: 15_000 },
    Plan { name: "4.5GB Plan", ram: "4.5GB", cpu: "250%", disk: "15GB", max_players: Some(70), cost_points: 25_000 },
    Plan { name: "6GB Plan", ram: "6GB", cpu: "300%", disk: "20GB", max_players: Some(100), cost_points: 30_000 },
    Plan { name: "8GB Plan", ram: "8GB", cpu: "400%", disk: "30GB", max_players: Some(150), cost_points: 40_000 },
    Plan { name: "12GB Plan", ram: "12GB", cpu: "500%", disk: "35GB", max_players: Some(225), cost_points: 50_000 },
    Plan { name: "16GB Plan", ram: "16GB", cpu: "600%", disk: "40GB", max_players: Some(300), cost_points: 85_000 },
    Plan { name: "32GB Plan", ram: "32GB", cpu: "800%", disk: "50GB", max_players: Some(600), cost_points: 135_000 },
];

pub const BOT_PLANS: &[Plan] = &[
    Plan { name: "Starter", ram: "256MB", cpu: "20%", disk: "1GB", max_players: None, cost_points: 20_000 },
    Plan { name: "Starter+", ram: "512MB", cpu: "25%", disk: "2GB", max_players: None, cost_points: 50_000 },
    Plan { name: "Advanced", ram: "1GB", cpu: "50%", disk: "3GB", max_players: None, cost_points: 65_000 },
    Plan { name: "Advanced+", ram: "2GB", cpu: "100%", disk: "4GB", max_players: None, cost_points: 100_000 },
    Plan { name: "Pro", ram: "4GB", cpu: "150%", disk: "6GB", max_players: None, cost_points: 140_000 },
];

/// Catalog for a given server type
pub fn catalog(server_type: ServerType) -> &'static [Plan] {
    match server_type {
        ServerType::Minecraft => MINECRAFT_PLANS,
        ServerType::Bot => BOT_PLANS,
    }
}

/// Look up a plan by exact name match
pub fn find_plan(server_type: ServerType, name: &str) -> Option<&'static Plan> {
    catalog(server_type).iter().find(|plan| plan.name == name)
}

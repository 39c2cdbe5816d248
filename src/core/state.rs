// Application state (AppState)

use anyhow::Result;
use std::sync::Arc;

use crate::api::auth::AuthClient;
use crate::api::inventory::InventoryClient;
use crate::api::profiles::ProfileStore;
use crate::controllers::points::PointsLedger;
use crate::controllers::purchase::PurchaseController;
use crate::controllers::session::SessionController;
use crate::core::config::Config;
use crate::stores::session_store::SessionStore;

/// Shared application state
///
/// Contains all shared components accessed by request handlers. All fields
/// are wrapped in Arc for efficient cloning across threads.
pub struct AppState {
    /// Gateway session store
    pub sessions: Arc<SessionStore>,

    /// Backend auth API client
    pub auth: Arc<AuthClient>,

    /// Backend profiles (points balance) client
    pub profiles: Arc<ProfileStore>,

    /// Backend server inventory client
    pub inventory: Arc<InventoryClient>,

    /// Sign-in / restore / sign-out orchestration
    pub session_controller: SessionController,

    /// Claim cooldown enforcement
    pub points: PointsLedger,

    /// Affordability check + purchase procedure invocation
    pub purchase: PurchaseController,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let backend = &config.backend;

        let auth = Arc::new(AuthClient::new(
            backend.url.clone(),
            backend.anon_key.clone(),
            backend.request_timeout_secs,
        )?);

        let profiles = Arc::new(ProfileStore::new(
            backend.url.clone(),
            backend.anon_key.clone(),
            backend.request_timeout_secs,
        )?);

        let inventory = Arc::new(InventoryClient::new(
            backend.url.clone(),
            backend.anon_key.clone(),
            backend.request_timeout_secs,
        )?);

        let sessions = Arc::new(SessionStore::new());

        let session_controller = SessionController::new(
            Arc::clone(&auth),
            Arc::clone(&profiles),
            Arc::clone(&sessions),
            backend,
        );

        let points = PointsLedger::new(Arc::clone(&profiles), config.points.claim_cooldown_secs);

        let purchase = PurchaseController::new(Arc::clone(&profiles), Arc::clone(&inventory));

        Ok(Self {
            sessions,
            auth,
            profiles,
            inventory,
            session_controller,
            points,
            purchase,
            config,
        })
    }
}

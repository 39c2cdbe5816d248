use tracing::{info, warn};

use crate::api::auth::AuthClient;

// this runs at boot time
pub async fn check_backend(auth: &AuthClient, endpoint: &str) {
    match auth.health().await {
        Ok(()) => {
            info!(endpoint = %endpoint, "Backend auth API reachable");
        }
        Err(e) => {
            // The backend owns all durable state, so a failed probe is not
            // fatal; requests will surface their own errors.
            warn!(
                endpoint = %endpoint,
                error = %e,
                "Backend auth API probe failed, continuing startup"
            );
        }
    }
}

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the store and report how many completed games are still waiting to sync.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let pending = state.outbox().len();
    match state.game_store().health_check().await {
        Ok(()) => HealthResponse::ok(pending),
        Err(err) => {
            warn!(error = %err, pending, "storage health check failed");
            HealthResponse::degraded(pending)
        }
    }
}

use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Completed games still waiting to reach the store.
    pub pending_syncs: usize,
}

impl HealthResponse {
    /// Create a health response indicating the store answered.
    pub fn ok(pending_syncs: usize) -> Self {
        Self {
            status: "ok".to_string(),
            pending_syncs,
        }
    }

    /// Create a health response indicating the store could not be reached.
    pub fn degraded(pending_syncs: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            pending_syncs,
        }
    }
}

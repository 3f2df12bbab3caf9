use serde::Serialize;
use utoipa::ToSchema;

/// Message returned by the health endpoint.
pub const HEALTH_MESSAGE: &str = "Nebula Arcade Backend (Supabase) Online";

/// Simple health response returned by the `/api/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process serves requests.
    pub status: String,
    /// Human readable banner.
    pub message: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: HEALTH_MESSAGE.to_string(),
        }
    }
}

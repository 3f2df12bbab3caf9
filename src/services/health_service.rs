use crate::dto::health::HealthResponse;

/// Respond with the static health payload. Store reachability is not part of it.
pub fn health_status() -> HealthResponse {
    HealthResponse::ok()
}

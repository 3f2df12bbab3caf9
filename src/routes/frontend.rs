//! Static single-page frontend.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

/// Body returned for unmatched paths when no frontend build is available.
pub const FRONTEND_MISSING: &str = "Frontend not built. Run 'npm run build' in frontend/.";

/// Serve `<dist>/assets` and fall back to `<dist>/index.html` for every other path.
///
/// Availability is decided once, when the router is built.
pub fn router(dist: &Path) -> Router {
    let assets = dist.join("assets");
    let index = dist.join("index.html");

    let mut router = Router::new();
    if assets.is_dir() {
        router = router.nest_service("/assets", ServeDir::new(assets));
    }

    if index.is_file() {
        info!(dist = %dist.display(), "serving frontend build");
        router.fallback_service(ServeFile::new(index))
    } else {
        warn!(dist = %dist.display(), "frontend build not found; serving notice");
        router.fallback(missing_frontend)
    }
}

async fn missing_frontend() -> &'static str {
    FRONTEND_MISSING
}

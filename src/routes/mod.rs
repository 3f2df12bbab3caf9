use axum::Router;

use crate::state::SharedState;

pub mod catalog;
pub mod docs;
pub mod frontend;
pub mod health;
pub mod scores;

/// Compose all route trees, wiring in shared state, documentation and the static frontend.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(catalog::router())
        .merge(scores::router())
        .merge(docs::router());

    let frontend_router = frontend::router(state.config().frontend_dist());

    api_router
        .with_state(state)
        .merge(frontend_router)
}

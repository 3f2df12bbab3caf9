use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::catalog::GamesResponse, services::catalog_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/api/games",
    tag = "catalog",
    responses((status = 200, description = "Playable games", body = GamesResponse))
)]
/// List the games offered by the portal.
pub async fn list_games(State(state): State<SharedState>) -> Json<GamesResponse> {
    Json(catalog_service::list_games(&state))
}

/// Configure the catalog routes subtree.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/games", get(list_games))
}

//! Game catalog projection.

use crate::{
    dto::catalog::{GameSummary, GamesResponse},
    state::SharedState,
};

/// Return the catalog loaded at startup.
pub fn list_games(state: &SharedState) -> GamesResponse {
    let games = state
        .config()
        .games()
        .iter()
        .map(GameSummary::from)
        .collect();
    GamesResponse { games }
}

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::CatalogEntry;

/// Catalog entry as exposed to the frontend.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
}

impl From<&CatalogEntry> for GameSummary {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            description: entry.description.clone(),
            thumbnail: entry.thumbnail.clone(),
        }
    }
}

/// Response payload listing every playable game.
#[derive(Debug, Serialize, ToSchema)]
pub struct GamesResponse {
    pub games: Vec<GameSummary>,
}

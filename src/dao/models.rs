use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Username recorded when a submission does not carry one.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

/// A score achieved by a user in a game, as appended to the `scores` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Catalog identifier of the game; not checked against the catalog.
    pub game_id: String,
    /// Free-text player name.
    pub username: String,
    /// Score value.
    pub high_score: i64,
}

impl ScoreRecord {
    /// Build a record for `username` in `game_id`.
    pub fn new(game_id: impl Into<String>, username: impl Into<String>, high_score: i64) -> Self {
        Self {
            game_id: game_id.into(),
            username: username.into(),
            high_score,
        }
    }
}

/// Projection of a row used by top-score reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopScore {
    /// Score value.
    pub high_score: i64,
    /// Player who achieved it.
    pub username: String,
}

/// Keep the first row of each player from a best-first ranking.
///
/// History rows of a player sit below their best, so what remains is one row
/// per player holding their current best, still best first.
pub fn best_per_player(ranked: impl IntoIterator<Item = TopScore>) -> Vec<TopScore> {
    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|row| seen.insert(row.username.clone()))
        .collect()
}

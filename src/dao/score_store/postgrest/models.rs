use serde::Deserialize;

use crate::dao::models::TopScore;

/// Columns requested for top-score reads.
pub const TOP_SCORE_COLUMNS: &str = "high_score,username";
/// Columns requested for a player's best.
pub const USER_BEST_COLUMNS: &str = "high_score";
/// Ordering clause putting the best row first.
pub const BEST_FIRST: &str = "high_score.desc";

/// Row shape returned for [`TOP_SCORE_COLUMNS`].
#[derive(Debug, Deserialize)]
pub struct TopScoreRow {
    pub high_score: i64,
    #[serde(default)]
    pub username: Option<String>,
}

impl From<TopScoreRow> for TopScore {
    fn from(row: TopScoreRow) -> Self {
        TopScore {
            high_score: row.high_score,
            username: row.username.unwrap_or_default(),
        }
    }
}

/// Row shape returned for [`USER_BEST_COLUMNS`].
#[derive(Debug, Deserialize)]
pub struct UserBestRow {
    pub high_score: i64,
}

/// PostgREST equality filter value.
pub fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_score_row_tolerates_null_username() {
        let row: TopScoreRow =
            serde_json::from_str(r#"{"high_score": 12, "username": null}"#).unwrap();
        let top: TopScore = row.into();
        assert_eq!(top.high_score, 12);
        assert_eq!(top.username, "");
    }

    #[test]
    fn eq_filter_keeps_value_verbatim() {
        assert_eq!(eq("neon-snake"), "eq.neon-snake");
        assert_eq!(eq("a.b,c"), "eq.a.b,c");
    }
}

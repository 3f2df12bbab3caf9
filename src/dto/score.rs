//! DTO definitions for score reads and submissions.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    dao::models::{ANONYMOUS_USERNAME, TopScore},
    error::ServiceError,
};

/// Payload posted when a game ends.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScoreSubmission {
    #[validate(length(min = 1, max = 64))]
    pub game_id: String,
    pub score: i64,
    /// Defaults to "Anonymous" when omitted.
    #[serde(default = "default_username")]
    #[validate(length(min = 1, max = 64))]
    pub username: String,
}

fn default_username() -> String {
    ANONYMOUS_USERNAME.to_string()
}

/// Best score of a game.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreResponse {
    pub high_score: i64,
    pub username: String,
    /// Present when the store could not be queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HighScoreResponse {
    /// Zero value returned when nobody has scored yet.
    pub fn empty() -> Self {
        Self {
            high_score: 0,
            username: String::new(),
            error: None,
        }
    }

    /// Zero value annotated with the failure.
    pub fn degraded(err: &ServiceError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::empty()
        }
    }
}

impl From<TopScore> for HighScoreResponse {
    fn from(top: TopScore) -> Self {
        Self {
            high_score: top.high_score,
            username: top.username,
            error: None,
        }
    }
}

/// Outcome of a score submission.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    /// Whether the submission beat the player's previous best.
    pub new_record: bool,
    /// Player's best after the submission. Absent when no store is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitScoreResponse {
    /// The submission was recorded as the player's new best.
    pub fn recorded(score: i64) -> Self {
        Self {
            new_record: true,
            high_score: Some(score),
            error: None,
        }
    }

    /// The submission did not beat `current_best`.
    pub fn kept(current_best: i64) -> Self {
        Self {
            new_record: false,
            high_score: Some(current_best),
            error: None,
        }
    }

    /// Failure response. A store that exists but failed still reports a zero best.
    pub fn degraded(err: &ServiceError) -> Self {
        let high_score = match err {
            ServiceError::NotConfigured => None,
            _ => Some(0),
        };
        Self {
            new_record: false,
            high_score,
            error: Some(err.to_string()),
        }
    }
}

/// Query string accepted by the leaderboard endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Number of entries to return (1-100, default 10).
    pub limit: Option<u32>,
}

/// Single leaderboard line.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: i64,
}

impl From<TopScore> for LeaderboardEntry {
    fn from(top: TopScore) -> Self {
        Self {
            username: top.username,
            score: top.high_score,
        }
    }
}

/// Best scores of a game, best first.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub game_id: String,
    pub entries: Vec<LeaderboardEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Best score of one player in one game.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBestResponse {
    pub game_id: String,
    pub username: String,
    pub high_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submission_defaults_username_to_anonymous() {
        let submission: ScoreSubmission =
            serde_json::from_value(json!({"game_id": "geodash", "score": 7})).unwrap();
        assert_eq!(submission.username, "Anonymous");
        assert!(submission.validate().is_ok());
    }

    #[test]
    fn submission_rejects_empty_game_id() {
        let submission: ScoreSubmission =
            serde_json::from_value(json!({"game_id": "", "score": 7, "username": "a"})).unwrap();
        assert!(submission.validate().is_err());
    }

    #[test]
    fn degraded_submit_without_store_omits_high_score() {
        let body = serde_json::to_value(SubmitScoreResponse::degraded(&ServiceError::NotConfigured))
            .unwrap();
        assert_eq!(
            body,
            json!({"newRecord": false, "error": "score store not configured"})
        );
    }

    #[test]
    fn high_score_serializes_in_camel_case() {
        let body = serde_json::to_value(HighScoreResponse::from(TopScore {
            high_score: 50,
            username: "Alice".into(),
        }))
        .unwrap();
        assert_eq!(body, json!({"highScore": 50, "username": "Alice"}));
    }
}

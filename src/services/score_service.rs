//! Score reads and submissions.
//!
//! Store failures never reach the HTTP caller as errors: each operation
//! resolves a `Result<_, ServiceError>` into its zero-value response with an
//! `error` annotation. Submissions are read-then-append and not atomic, so two
//! concurrent improving submissions for the same player may both append a row;
//! reads always take the best row, which keeps the observable best correct.

use tracing::{error, info, warn};

use crate::{
    dao::models::{ScoreRecord, TopScore},
    dto::score::{
        HighScoreResponse, LeaderboardEntry, LeaderboardResponse, ScoreSubmission,
        SubmitScoreResponse, UserBestResponse,
    },
    error::ServiceError,
    state::SharedState,
};

/// Leaderboard length when the caller does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;
/// Largest leaderboard a caller may request.
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Outcome of the read-modify-write behind a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The score beat the previous best and a row was appended.
    Recorded(i64),
    /// The score did not beat the previous best, which is carried here.
    Kept(i64),
}

/// Return the best score recorded for `game_id`.
pub async fn get_high_score(state: &SharedState, game_id: &str) -> HighScoreResponse {
    resolve_high_score(game_id, fetch_top(state, game_id).await)
}

/// Record `submission` if it beats the submitting player's best.
pub async fn submit_score(state: &SharedState, submission: ScoreSubmission) -> SubmitScoreResponse {
    let game_id = submission.game_id.clone();
    let username = submission.username.clone();
    let outcome = record_if_better(state, submission).await;
    resolve_submission(&game_id, &username, outcome)
}

/// Return the best score of up to `limit` players of `game_id`.
pub async fn get_leaderboard(
    state: &SharedState,
    game_id: &str,
    limit: Option<u32>,
) -> Result<LeaderboardResponse, ServiceError> {
    let limit = limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    if !(1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
        return Err(ServiceError::InvalidInput(format!(
            "limit must be between 1 and {MAX_LEADERBOARD_LIMIT} (got {limit})"
        )));
    }

    let outcome = fetch_leaderboard(state, game_id, limit as usize).await;
    let (entries, error) = match outcome {
        Ok(rows) => (rows.into_iter().map(LeaderboardEntry::from).collect(), None),
        Err(err) => {
            report("fetch leaderboard", game_id, None, &err);
            (Vec::new(), Some(err.to_string()))
        }
    };

    Ok(LeaderboardResponse {
        game_id: game_id.to_string(),
        entries,
        error,
    })
}

/// Return the best score of `username` in `game_id`.
pub async fn get_user_best(state: &SharedState, game_id: &str, username: &str) -> UserBestResponse {
    let (high_score, error) = match fetch_user_best(state, game_id, username).await {
        Ok(best) => (best.unwrap_or(0), None),
        Err(err) => {
            report("fetch user best", game_id, Some(username), &err);
            (0, Some(err.to_string()))
        }
    };

    UserBestResponse {
        game_id: game_id.to_string(),
        username: username.to_string(),
        high_score,
        error,
    }
}

async fn fetch_top(state: &SharedState, game_id: &str) -> Result<Option<TopScore>, ServiceError> {
    let store = state.require_score_store()?;
    Ok(store.find_top(game_id).await?)
}

async fn fetch_leaderboard(
    state: &SharedState,
    game_id: &str,
    limit: usize,
) -> Result<Vec<TopScore>, ServiceError> {
    let store = state.require_score_store()?;
    Ok(store.list_top(game_id, limit).await?)
}

async fn fetch_user_best(
    state: &SharedState,
    game_id: &str,
    username: &str,
) -> Result<Option<i64>, ServiceError> {
    let store = state.require_score_store()?;
    Ok(store.find_user_best(game_id, username).await?)
}

async fn record_if_better(
    state: &SharedState,
    submission: ScoreSubmission,
) -> Result<SubmitOutcome, ServiceError> {
    let store = state.require_score_store()?;
    let current_best = store
        .find_user_best(&submission.game_id, &submission.username)
        .await?
        .unwrap_or(0);

    if submission.score <= current_best {
        return Ok(SubmitOutcome::Kept(current_best));
    }

    let score = submission.score;
    store
        .insert(ScoreRecord::new(
            submission.game_id,
            submission.username,
            score,
        ))
        .await?;
    Ok(SubmitOutcome::Recorded(score))
}

/// Map a top-score lookup to its response, degrading failures to the zero value.
pub fn resolve_high_score(
    game_id: &str,
    outcome: Result<Option<TopScore>, ServiceError>,
) -> HighScoreResponse {
    match outcome {
        Ok(Some(top)) => top.into(),
        Ok(None) => HighScoreResponse::empty(),
        Err(err) => {
            report("fetch high score", game_id, None, &err);
            HighScoreResponse::degraded(&err)
        }
    }
}

/// Map a submission outcome to its response, degrading failures to the zero value.
pub fn resolve_submission(
    game_id: &str,
    username: &str,
    outcome: Result<SubmitOutcome, ServiceError>,
) -> SubmitScoreResponse {
    match outcome {
        Ok(SubmitOutcome::Recorded(score)) => {
            info!(game_id, username, score, "new personal best recorded");
            SubmitScoreResponse::recorded(score)
        }
        Ok(SubmitOutcome::Kept(best)) => SubmitScoreResponse::kept(best),
        Err(err) => {
            report("submit score", game_id, Some(username), &err);
            SubmitScoreResponse::degraded(&err)
        }
    }
}

fn report(operation: &'static str, game_id: &str, username: Option<&str>, err: &ServiceError) {
    match err {
        ServiceError::Unavailable(source) => {
            error!(operation, game_id, ?username, error = %source, "score store call failed")
        }
        other => warn!(operation, game_id, ?username, error = %other, "score request not served"),
    }
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::score::{
        HighScoreResponse, LeaderboardQuery, LeaderboardResponse, ScoreSubmission,
        SubmitScoreResponse, UserBestResponse,
    },
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Score read and submission endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/scores", post(submit_score))
        .route("/api/scores/{game_id}", get(get_high_score))
        .route("/api/scores/{game_id}/leaderboard", get(get_leaderboard))
        .route("/api/scores/{game_id}/users/{username}", get(get_user_best))
}

#[utoipa::path(
    get,
    path = "/api/scores/{game_id}",
    tag = "scores",
    params(("game_id" = String, Path, description = "Catalog identifier of the game")),
    responses(
        (status = 200, description = "Best score of the game, zero when none or when the store failed", body = HighScoreResponse)
    )
)]
/// Return the best score recorded for a game and who achieved it.
pub async fn get_high_score(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Json<HighScoreResponse> {
    Json(score_service::get_high_score(&state, &game_id).await)
}

#[utoipa::path(
    post,
    path = "/api/scores",
    tag = "scores",
    request_body = ScoreSubmission,
    responses(
        (status = 200, description = "Submission processed", body = SubmitScoreResponse),
        (status = 400, description = "Submission failed validation"),
        (status = 422, description = "Submission is not a valid score payload")
    )
)]
/// Submit a score; it is stored only when it beats the player's best.
pub async fn submit_score(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ScoreSubmission>>,
) -> Json<SubmitScoreResponse> {
    Json(score_service::submit_score(&state, payload).await)
}

#[utoipa::path(
    get,
    path = "/api/scores/{game_id}/leaderboard",
    tag = "scores",
    params(
        ("game_id" = String, Path, description = "Catalog identifier of the game"),
        LeaderboardQuery
    ),
    responses(
        (status = 200, description = "Best scores, best first", body = LeaderboardResponse),
        (status = 400, description = "Limit out of range")
    )
)]
/// Return the best scores of a game.
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    score_service::get_leaderboard(&state, &game_id, query.limit)
        .await
        .map(Json)
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/scores/{game_id}/users/{username}",
    tag = "scores",
    params(
        ("game_id" = String, Path, description = "Catalog identifier of the game"),
        ("username" = String, Path, description = "Player name")
    ),
    responses((status = 200, description = "Player's best score", body = UserBestResponse))
)]
/// Return a player's best score in a game.
pub async fn get_user_best(
    State(state): State<SharedState>,
    Path((game_id, username)): Path<(String, String)>,
) -> Json<UserBestResponse> {
    Json(score_service::get_user_best(&state, &game_id, &username).await)
}

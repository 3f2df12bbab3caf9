use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Nebula Arcade Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::catalog::list_games,
        crate::routes::scores::get_high_score,
        crate::routes::scores::submit_score,
        crate::routes::scores::get_leaderboard,
        crate::routes::scores::get_user_best,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::catalog::GamesResponse,
            crate::dto::catalog::GameSummary,
            crate::dto::score::ScoreSubmission,
            crate::dto::score::HighScoreResponse,
            crate::dto::score::SubmitScoreResponse,
            crate::dto::score::LeaderboardResponse,
            crate::dto::score::LeaderboardEntry,
            crate::dto::score::UserBestResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Game catalog"),
        (name = "scores", description = "High score reads and submissions"),
    )
)]
pub struct ApiDoc;

pub mod memory;
#[cfg(feature = "postgrest-store")]
pub mod postgrest;

use crate::dao::models::{ScoreRecord, TopScore};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the remote `scores` table.
///
/// The table is append-only: a player's current best is always derived by
/// ordering their rows by `high_score` descending, so duplicate rows never
/// change what readers observe.
pub trait ScoreStore: Send + Sync {
    /// Best row of `game_id`, ties broken by the backend's natural order.
    fn find_top(&self, game_id: &str) -> BoxFuture<'static, StorageResult<Option<TopScore>>>;
    /// Up to `limit` players of `game_id` with their best score, best first.
    fn list_top(
        &self,
        game_id: &str,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<TopScore>>>;
    /// Best score recorded by `username` in `game_id`.
    fn find_user_best(
        &self,
        game_id: &str,
        username: &str,
    ) -> BoxFuture<'static, StorageResult<Option<i64>>>;
    /// Append one row. No conflict detection.
    fn insert(&self, record: ScoreRecord) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap round-trip used to report reachability.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

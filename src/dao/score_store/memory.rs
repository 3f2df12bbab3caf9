//! Process-local [`ScoreStore`] used by tests and local tooling.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::dao::{
    models::{ScoreRecord, TopScore, best_per_player},
    score_store::ScoreStore,
    storage::{StorageError, StorageResult},
};

/// In-memory score table with the same append-only semantics as the remote one.
#[derive(Clone, Default)]
pub struct MemoryScoreStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rows: RwLock<Vec<StoredScore>>,
    offline: AtomicBool,
}

struct StoredScore {
    id: Uuid,
    record: ScoreRecord,
}

impl MemoryScoreStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of every stored row with its generated identifier, in insertion order.
    pub async fn rows(&self) -> Vec<(Uuid, ScoreRecord)> {
        self.inner
            .rows
            .read()
            .await
            .iter()
            .map(|row| (row.id, row.record.clone()))
            .collect()
    }

    fn ensure_online(&self) -> StorageResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                "in-memory score store is offline".into(),
                io::Error::new(io::ErrorKind::ConnectionRefused, "store offline"),
            ));
        }
        Ok(())
    }

    async fn ranked(&self, game_id: &str, username: Option<&str>) -> Vec<TopScore> {
        let rows = self.inner.rows.read().await;
        let mut ranked = rows
            .iter()
            .map(|row| &row.record)
            .filter(|record| record.game_id == game_id)
            .filter(|record| username.is_none_or(|name| record.username == name))
            .map(|record| TopScore {
                high_score: record.high_score,
                username: record.username.clone(),
            })
            .collect::<Vec<_>>();
        // Stable sort: among equal scores the oldest row comes first.
        ranked.sort_by(|a, b| b.high_score.cmp(&a.high_score));
        ranked
    }
}

impl ScoreStore for MemoryScoreStore {
    fn find_top(&self, game_id: &str) -> BoxFuture<'static, StorageResult<Option<TopScore>>> {
        let store = self.clone();
        let game_id = game_id.to_owned();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store.ranked(&game_id, None).await.into_iter().next())
        })
    }

    fn list_top(
        &self,
        game_id: &str,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<TopScore>>> {
        let store = self.clone();
        let game_id = game_id.to_owned();
        Box::pin(async move {
            store.ensure_online()?;
            let mut board = best_per_player(store.ranked(&game_id, None).await);
            board.truncate(limit);
            Ok(board)
        })
    }

    fn find_user_best(
        &self,
        game_id: &str,
        username: &str,
    ) -> BoxFuture<'static, StorageResult<Option<i64>>> {
        let store = self.clone();
        let game_id = game_id.to_owned();
        let username = username.to_owned();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store
                .ranked(&game_id, Some(&username))
                .await
                .first()
                .map(|top| top.high_score))
        })
    }

    fn insert(&self, record: ScoreRecord) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            let id = Uuid::new_v4();
            debug!(%id, game_id = %record.game_id, username = %record.username, "appending score row");
            store.inner.rows.write().await.push(StoredScore { id, record });
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }
}

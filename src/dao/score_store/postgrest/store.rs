use std::{collections::HashSet, sync::Arc};

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Url, header::HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dao::{
    models::{ScoreRecord, TopScore},
    score_store::ScoreStore,
    storage::StorageResult,
};

use super::{
    config::PostgrestConfig,
    error::{PostgrestDaoError, PostgrestResult},
    models::{BEST_FIRST, TOP_SCORE_COLUMNS, TopScoreRow, USER_BEST_COLUMNS, UserBestRow, eq},
};

/// Rows fetched per request while collecting distinct leaderboard players.
const LEADERBOARD_PAGE: usize = 200;

/// [`ScoreStore`] backed by a PostgREST endpoint (e.g. a hosted Supabase project).
#[derive(Clone)]
pub struct PostgrestScoreStore {
    client: Client,
    table_url: Arc<str>,
    table: Arc<str>,
    api_key: Option<Arc<str>>,
}

impl PostgrestScoreStore {
    /// Build the HTTP client for the configured endpoint.
    ///
    /// No request is issued; reachability is only known after the first call
    /// or an explicit [`ScoreStore::health_check`].
    pub fn connect(config: PostgrestConfig) -> PostgrestResult<Self> {
        let base_url = config.base_url.trim_end_matches('/');
        let parsed = Url::parse(base_url).map_err(|err| PostgrestDaoError::InvalidUrl {
            url: config.base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PostgrestDaoError::InvalidUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        if let Some(key) = config.api_key.as_deref() {
            HeaderValue::from_str(key)
                .map_err(|source| PostgrestDaoError::InvalidApiKey { source })?;
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| PostgrestDaoError::ClientBuilder { source })?;

        Ok(Self {
            client,
            table_url: Arc::from(format!("{}/rest/v1/{}", base_url, config.table)),
            table: Arc::from(config.table),
            api_key: config.api_key.map(Arc::from),
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let builder = self.client.request(method, self.table_url.as_ref());
        if let Some(ref key) = self.api_key {
            builder
                .header("apikey", key.as_ref())
                .bearer_auth(key.as_ref())
        } else {
            builder
        }
    }

    async fn select<T>(&self, query: &[(&str, String)]) -> PostgrestResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET)
            .query(query)
            .send()
            .await
            .map_err(|source| PostgrestDaoError::RequestSend {
                table: self.table.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PostgrestDaoError::RequestStatus {
                table: self.table.to_string(),
                status,
                detail,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|source| PostgrestDaoError::DecodeResponse {
                table: self.table.to_string(),
                source,
            })
    }

    async fn append(&self, record: &ScoreRecord) -> PostgrestResult<()> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|source| PostgrestDaoError::RequestSend {
                table: self.table.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            Err(PostgrestDaoError::RequestStatus {
                table: self.table.to_string(),
                status,
                detail,
            })
        }
    }

    async fn top_rows(
        &self,
        game_id: &str,
        limit: usize,
        offset: usize,
    ) -> PostgrestResult<Vec<TopScore>> {
        let mut query = vec![
            ("select", TOP_SCORE_COLUMNS.to_string()),
            ("game_id", eq(game_id)),
            ("order", BEST_FIRST.to_string()),
            ("limit", limit.to_string()),
        ];
        if offset > 0 {
            query.push(("offset", offset.to_string()));
        }
        let rows = self.select::<TopScoreRow>(&query).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Walk the best-first history page by page until `limit` distinct
    /// players are found or the rows run out.
    async fn best_per_player(&self, game_id: &str, limit: usize) -> PostgrestResult<Vec<TopScore>> {
        let mut seen = HashSet::new();
        let mut board = Vec::with_capacity(limit);
        let mut offset = 0;

        while board.len() < limit {
            let page = self.top_rows(game_id, LEADERBOARD_PAGE, offset).await?;
            let fetched = page.len();
            let room = limit - board.len();
            board.extend(
                page.into_iter()
                    .filter(|row| seen.insert(row.username.clone()))
                    .take(room),
            );
            if fetched < LEADERBOARD_PAGE {
                break;
            }
            offset += fetched;
        }

        Ok(board)
    }
}

impl ScoreStore for PostgrestScoreStore {
    fn find_top(&self, game_id: &str) -> BoxFuture<'static, StorageResult<Option<TopScore>>> {
        let store = self.clone();
        let game_id = game_id.to_owned();
        Box::pin(async move {
            let rows = store.top_rows(&game_id, 1, 0).await?;
            Ok(rows.into_iter().next())
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
            store
                .best_per_player(&game_id, limit)
                .await
                .map_err(Into::into)
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
            let query = [
                ("select", USER_BEST_COLUMNS.to_string()),
                ("game_id", eq(&game_id)),
                ("username", eq(&username)),
                ("order", BEST_FIRST.to_string()),
                ("limit", "1".to_string()),
            ];
            let rows = store.select::<UserBestRow>(&query).await?;
            Ok(rows.first().map(|row| row.high_score))
        })
    }

    fn insert(&self, record: ScoreRecord) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.append(&record).await?;
            debug!(game_id = %record.game_id, username = %record.username, score = record.high_score, "score row appended");
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let query = [
                ("select", USER_BEST_COLUMNS.to_string()),
                ("limit", "1".to_string()),
            ];
            store.select::<UserBestRow>(&query).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::Mutex,
    };

    use axum::{
        Router,
        extract::{Query, State},
        http::{HeaderMap, Method as HttpMethod, StatusCode, header},
        routing::any,
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;
    use crate::dao::storage::StorageError;

    /// A request as seen by [`FakePostgrest`].
    struct Seen {
        method: HttpMethod,
        query: Vec<(String, String)>,
        headers: HeaderMap,
        body: String,
    }

    impl Seen {
        fn param(&self, name: &str) -> Option<&str> {
            self.query
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }

        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|value| value.to_str().ok())
        }
    }

    /// Stand-in for a PostgREST table: records every request and answers with
    /// queued replies, then with an empty array.
    #[derive(Clone, Default)]
    struct FakePostgrest {
        replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
        seen: Arc<Mutex<Vec<Seen>>>,
    }

    impl FakePostgrest {
        fn reply(self, status: StatusCode, body: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back((status, body.into()));
            self
        }

        fn take_seen(&self) -> Vec<Seen> {
            std::mem::take(&mut *self.seen.lock().unwrap())
        }

        async fn serve(&self) -> String {
            let app = Router::new()
                .route("/rest/v1/scores", any(capture))
                .with_state(self.clone());
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{addr}")
        }
    }

    async fn capture(
        State(fake): State<FakePostgrest>,
        method: HttpMethod,
        Query(query): Query<Vec<(String, String)>>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
        fake.seen.lock().unwrap().push(Seen {
            method,
            query,
            headers,
            body,
        });
        let (status, body) = fake
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::OK, "[]".into()));
        (status, [(header::CONTENT_TYPE, "application/json")], body)
    }

    async fn store_for(fake: &FakePostgrest, api_key: Option<&str>) -> PostgrestScoreStore {
        let mut config = PostgrestConfig::new(fake.serve().await);
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        PostgrestScoreStore::connect(config).unwrap()
    }

    #[tokio::test]
    async fn find_top_filters_orders_and_authenticates() {
        let fake = FakePostgrest::default()
            .reply(StatusCode::OK, r#"[{"high_score": 50, "username": "Alice"}]"#);
        let store = store_for(&fake, Some("anon-key")).await;

        let top = store.find_top("neon-snake").await.unwrap().unwrap();
        assert_eq!(top.high_score, 50);
        assert_eq!(top.username, "Alice");

        let seen = fake.take_seen();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.method, HttpMethod::GET);
        assert_eq!(request.param("select"), Some(TOP_SCORE_COLUMNS));
        assert_eq!(request.param("game_id"), Some("eq.neon-snake"));
        assert_eq!(request.param("order"), Some(BEST_FIRST));
        assert_eq!(request.param("limit"), Some("1"));
        assert_eq!(request.param("offset"), None);
        assert_eq!(request.header("apikey"), Some("anon-key"));
        assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
    }

    #[tokio::test]
    async fn find_top_of_empty_table_is_none() {
        let fake = FakePostgrest::default();
        let store = store_for(&fake, None).await;

        assert!(store.find_top("geodash").await.unwrap().is_none());
        let seen = fake.take_seen();
        assert_eq!(seen[0].header("apikey"), None);
        assert_eq!(seen[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn find_user_best_filters_on_both_columns() {
        let fake = FakePostgrest::default().reply(StatusCode::OK, r#"[{"high_score": 35}]"#);
        let store = store_for(&fake, None).await;

        let best = store.find_user_best("geodash", "alice").await.unwrap();
        assert_eq!(best, Some(35));

        let seen = fake.take_seen();
        let request = &seen[0];
        assert_eq!(request.param("select"), Some(USER_BEST_COLUMNS));
        assert_eq!(request.param("game_id"), Some("eq.geodash"));
        assert_eq!(request.param("username"), Some("eq.alice"));
        assert_eq!(request.param("order"), Some(BEST_FIRST));
        assert_eq!(request.param("limit"), Some("1"));
    }

    #[tokio::test]
    async fn insert_posts_row_with_minimal_return() {
        let fake = FakePostgrest::default().reply(StatusCode::CREATED, "");
        let store = store_for(&fake, Some("service-key")).await;

        store
            .insert(ScoreRecord::new("void-runner", "carol", 80))
            .await
            .unwrap();

        let seen = fake.take_seen();
        let request = &seen[0];
        assert_eq!(request.method, HttpMethod::POST);
        assert_eq!(request.header("prefer"), Some("return=minimal"));
        assert_eq!(request.header("apikey"), Some("service-key"));
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            json!({"game_id": "void-runner", "username": "carol", "high_score": 80})
        );
    }

    #[tokio::test]
    async fn error_status_is_a_rejection() {
        let fake = FakePostgrest::default()
            .reply(StatusCode::UNAUTHORIZED, r#"{"message": "JWT expired"}"#)
            .reply(StatusCode::CONFLICT, r#"{"message": "duplicate"}"#);
        let store = store_for(&fake, Some("stale")).await;

        let err = store.find_top("geodash").await.unwrap_err();
        assert!(matches!(err, StorageError::Rejected { .. }));
        assert!(err.to_string().contains("JWT expired"));

        let err = store
            .insert(ScoreRecord::new("geodash", "a", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Rejected { .. }));
    }

    #[tokio::test]
    async fn undecodable_body_is_unavailable() {
        let fake = FakePostgrest::default().reply(StatusCode::OK, "<html>proxy error</html>");
        let store = store_for(&fake, None).await;

        let err = store.find_user_best("geodash", "a").await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn list_top_pages_until_enough_distinct_players() {
        let alice_history = (0..LEADERBOARD_PAGE as i64)
            .map(|step| json!({"high_score": 1_000 - step, "username": "Alice"}))
            .collect::<Vec<_>>();
        let fake = FakePostgrest::default()
            .reply(StatusCode::OK, Value::from(alice_history).to_string())
            .reply(
                StatusCode::OK,
                r#"[{"high_score": 10, "username": "Bob"}, {"high_score": 5, "username": "Alice"}]"#,
            );
        let store = store_for(&fake, None).await;

        let board = store.list_top("geodash", 3).await.unwrap();
        let board = board
            .iter()
            .map(|row| (row.username.as_str(), row.high_score))
            .collect::<Vec<_>>();
        assert_eq!(board, [("Alice", 1_000), ("Bob", 10)]);

        let seen = fake.take_seen();
        assert_eq!(seen.len(), 2);
        let page = LEADERBOARD_PAGE.to_string();
        assert_eq!(seen[0].param("limit"), Some(page.as_str()));
        assert_eq!(seen[0].param("offset"), None);
        assert_eq!(seen[1].param("offset"), Some(page.as_str()));
    }

    #[tokio::test]
    async fn list_top_stops_once_limit_is_reached() {
        let fake = FakePostgrest::default().reply(
            StatusCode::OK,
            r#"[{"high_score": 50, "username": "Alice"}, {"high_score": 40, "username": "Alice"}, {"high_score": 10, "username": "Bob"}]"#,
        );
        let store = store_for(&fake, None).await;

        let board = store.list_top("geodash", 1).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "Alice");
        assert_eq!(fake.take_seen().len(), 1);
    }

    #[test]
    fn connect_builds_table_url_without_duplicate_slash() {
        let store = PostgrestScoreStore::connect(PostgrestConfig::new("https://demo.supabase.co/"))
            .unwrap();
        assert_eq!(
            store.table_url.as_ref(),
            "https://demo.supabase.co/rest/v1/scores"
        );
        assert!(store.api_key.is_none());
    }

    #[test]
    fn connect_rejects_malformed_url() {
        let err = PostgrestScoreStore::connect(PostgrestConfig::new("not a url"))
            .err()
            .unwrap();
        assert!(matches!(err, PostgrestDaoError::InvalidUrl { .. }));
    }

    #[test]
    fn connect_rejects_non_http_scheme() {
        let err = PostgrestScoreStore::connect(PostgrestConfig::new("ftp://example.com"))
            .err()
            .unwrap();
        assert!(matches!(err, PostgrestDaoError::InvalidUrl { .. }));
    }

    #[test]
    fn connect_rejects_key_with_newline() {
        let config = PostgrestConfig::new("https://demo.supabase.co").with_api_key("abc\ndef");
        let err = PostgrestScoreStore::connect(config).err().unwrap();
        assert!(matches!(err, PostgrestDaoError::InvalidApiKey { .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_storage_error() {
        // Port 9 (discard) on loopback is not expected to run an HTTP server.
        let store = PostgrestScoreStore::connect(PostgrestConfig::new("http://127.0.0.1:9"))
            .unwrap();
        let err = store.find_top("neon-snake").await.unwrap_err();
        assert!(err.to_string().starts_with("storage unavailable"));
    }
}

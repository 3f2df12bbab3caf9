use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:54321";
const DEFAULT_TABLE: &str = "scores";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration describing how to reach the PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// API key sent as both `apikey` and bearer token, if any.
    pub api_key: Option<String>,
    /// Table holding score rows.
    pub table: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl PostgrestConfig {
    /// Construct a configuration targeting the default `scores` table.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach the API key used to authenticate requests.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Build a configuration from the environment, falling back to a local instance.
    ///
    /// Reads `SUPABASE_URL`, `SUPABASE_KEY`, `SUPABASE_SCORES_TABLE` and
    /// `SUPABASE_TIMEOUT_SECS`. Empty values count as unset.
    pub fn from_env() -> Self {
        let base_url = non_empty_var("SUPABASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let mut config = Self::new(base_url);

        if let Some(key) = non_empty_var("SUPABASE_KEY") {
            config = config.with_api_key(key);
        }
        if let Some(table) = non_empty_var("SUPABASE_SCORES_TABLE") {
            config.table = table;
        }
        if let Some(secs) = non_empty_var("SUPABASE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

use std::sync::Arc;

use crate::{config::AppConfig, dao::score_store::ScoreStore, error::ServiceError};

/// Handle cloned into every request handler.
pub type SharedState = Arc<AppState>;

/// Immutable application state: startup configuration and the injected score store.
///
/// Nothing in here changes after startup; every mutable fact lives in the store.
pub struct AppState {
    config: AppConfig,
    score_store: Option<Arc<dyn ScoreStore>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// Passing `None` runs the service without persistence: score endpoints
    /// answer with their zero values and an `error` field.
    pub fn new(config: AppConfig, score_store: Option<Arc<dyn ScoreStore>>) -> SharedState {
        Arc::new(Self {
            config,
            score_store,
        })
    }

    /// Startup configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the score store, failing when none is configured.
    pub fn require_score_store(&self) -> Result<Arc<dyn ScoreStore>, ServiceError> {
        self.score_store.clone().ok_or(ServiceError::NotConfigured)
    }
}

//! Nebula Arcade Back binary entrypoint wiring the REST API, the score store and the static frontend.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nebula_arcade_back::{
    config::AppConfig,
    dao::score_store::ScoreStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let port = config.port();
    let score_store = init_score_store().await;

    let app_state = AppState::new(config, score_store);
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    info!("server stopped");
    Ok(())
}

/// Build the score store from the environment.
///
/// A store that cannot be built leaves the service without persistence; a
/// store that is merely unreachable is kept, since every call reports its own
/// failure.
#[cfg(feature = "postgrest-store")]
async fn init_score_store() -> Option<Arc<dyn ScoreStore>> {
    use nebula_arcade_back::dao::score_store::postgrest::{PostgrestConfig, PostgrestScoreStore};
    use tracing::{error, warn};

    let config = PostgrestConfig::from_env();
    let base_url = config.base_url.clone();
    match PostgrestScoreStore::connect(config) {
        Ok(store) => {
            match store.health_check().await {
                Ok(()) => info!(%base_url, "score store reachable"),
                Err(err) => warn!(%base_url, error = %err, "score store not reachable yet"),
            }
            Some(Arc::new(store))
        }
        Err(err) => {
            error!(%base_url, error = %err, "failed to initialise score store; scores disabled");
            None
        }
    }
}

#[cfg(not(feature = "postgrest-store"))]
async fn init_score_store() -> Option<Arc<dyn ScoreStore>> {
    tracing::warn!("built without a score store backend; scores disabled");
    None
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

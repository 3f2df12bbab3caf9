//! Application-level configuration loading, including the game catalog.

use std::{
    collections::HashSet,
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "NEBULA_ARCADE_CONFIG_PATH";
/// Default location of the built frontend, relative to the working directory.
const DEFAULT_FRONTEND_DIST: &str = "../frontend/dist";
/// Environment variable that overrides [`DEFAULT_FRONTEND_DIST`].
const FRONTEND_DIST_ENV: &str = "FRONTEND_DIST_DIR";
/// Port used when neither `PORT` nor `SERVER_PORT` is set.
pub const DEFAULT_PORT: u16 = 8000;

/// One playable game exposed by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier, also used as `game_id` for scores.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short tagline.
    pub description: String,
    /// Path of the thumbnail image served by the frontend.
    #[serde(alias = "thumbnail_path")]
    pub thumbnail: String,
}

/// Reasons a catalog file is rejected.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file is not valid JSON for the expected shape.
    #[error("invalid catalog JSON")]
    Parse(#[from] serde_json::Error),
    /// The file lists no games.
    #[error("catalog lists no games")]
    Empty,
    /// Two entries share an identifier.
    #[error("duplicate game id `{0}`")]
    DuplicateId(String),
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    games: Vec<CatalogEntry>,
    frontend_dist: PathBuf,
    port: u16,
}

impl AppConfig {
    /// Load the configuration from the environment and disk, falling back to the
    /// built-in catalog when the file is missing or unusable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let games = match fs::read_to_string(&path) {
            Ok(contents) => match parse_catalog(&contents) {
                Ok(games) => {
                    info!(
                        path = %path.display(),
                        count = games.len(),
                        "loaded game catalog from config"
                    );
                    games
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to built-in catalog"
                    );
                    default_games()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in catalog"
                );
                default_games()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to built-in catalog"
                );
                default_games()
            }
        };

        let frontend_dist = env::var_os(FRONTEND_DIST_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_DIST));

        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            games,
            frontend_dist,
            port,
        }
    }

    /// Point the static file routes at another build directory.
    pub fn with_frontend_dist(mut self, path: impl Into<PathBuf>) -> Self {
        self.frontend_dist = path.into();
        self
    }

    /// Games listed by the catalog endpoint, in display order.
    pub fn games(&self) -> &[CatalogEntry] {
        &self.games
    }

    /// Directory holding the built single-page frontend.
    pub fn frontend_dist(&self) -> &Path {
        &self.frontend_dist
    }

    /// TCP port the server binds to.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            games: default_games(),
            frontend_dist: PathBuf::from(DEFAULT_FRONTEND_DIST),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    games: Vec<CatalogEntry>,
}

/// Parse and check a catalog document.
pub fn parse_catalog(contents: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let raw = serde_json::from_str::<RawConfig>(contents)?;
    if raw.games.is_empty() {
        return Err(CatalogError::Empty);
    }

    {
        let mut seen = HashSet::new();
        if let Some(dup) = raw.games.iter().find(|game| !seen.insert(game.id.as_str())) {
            return Err(CatalogError::DuplicateId(dup.id.clone()));
        }
    }

    Ok(raw.games)
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn entry(id: &str, name: &str, description: &str, thumbnail: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        thumbnail: thumbnail.into(),
    }
}

/// Built-in catalog shipped with the binary.
fn default_games() -> Vec<CatalogEntry> {
    vec![
        entry(
            "neon-snake",
            "Neon Snake",
            "Classic Snake with a Neon Glow",
            "/assets/snake-thumb.png",
        ),
        entry(
            "cyber-breaker",
            "Cyber Breaker",
            "Particle-heavy Breakout",
            "/assets/breaker-thumb.png",
        ),
        entry(
            "geodash",
            "Neon Dash",
            "Rhythm-based Action Platformer",
            "/assets/geodash-thumb.png",
        ),
        entry(
            "void-runner",
            "Void Runner",
            "Infinite Runner in the Void",
            "/assets/runner-thumb.png",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_four_stable_ids() {
        let config = AppConfig::default();
        let ids = config
            .games()
            .iter()
            .map(|game| game.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["neon-snake", "cyber-breaker", "geodash", "void-runner"]);
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn parse_catalog_accepts_thumbnail_path_alias() {
        let games = parse_catalog(
            r#"{"games": [{"id": "tetra", "name": "Tetra", "description": "Blocks", "thumbnail_path": "/assets/t.png"}]}"#,
        )
        .unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].thumbnail, "/assets/t.png");
    }

    #[test]
    fn parse_catalog_rejects_empty_and_duplicates() {
        assert!(matches!(
            parse_catalog(r#"{"games": []}"#),
            Err(CatalogError::Empty)
        ));

        let dup = r#"{"games": [
            {"id": "a", "name": "A", "description": "", "thumbnail": ""},
            {"id": "a", "name": "B", "description": "", "thumbnail": ""}
        ]}"#;
        match parse_catalog(dup) {
            Err(CatalogError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn parse_catalog_rejects_malformed_json() {
        assert!(matches!(
            parse_catalog("{\"games\": [{\"id\": 1}]}"),
            Err(CatalogError::Parse(_))
        ));
    }
}

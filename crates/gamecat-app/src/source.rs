// Data retrieval boundary: where the raw `/games` and `/systems` payloads
// come from.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::SourceConfig;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The two record lists the catalog is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Games,
    Systems,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Games => write!(f, "games"),
            Resource::Systems => write!(f, "systems"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} did not return JSON: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("{0}")]
    Unavailable(String),
}

/// Anything that can hand over the raw catalog payloads.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_games(&self) -> Result<Value, FetchError>;
    async fn fetch_systems(&self) -> Result<Value, FetchError>;
}

// ---------------------------------------------------------------------------
// HttpSource
// ---------------------------------------------------------------------------

/// Reads both payloads from the catalog data service over HTTP.
pub struct HttpSource {
    http: reqwest::Client,
    games_url: String,
    systems_url: String,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Self {
        let base = config.base_url.trim_end_matches('/');
        Self {
            http: reqwest::Client::new(),
            games_url: format!("{base}{}", config.games_path),
            systems_url: format!("{base}{}", config.systems_path),
        }
    }

    pub fn url(&self, resource: Resource) -> &str {
        match resource {
            Resource::Games => &self.games_url,
            Resource::Systems => &self.systems_url,
        }
    }

    async fn get_json(&self, resource: Resource) -> Result<Value, FetchError> {
        let url = self.url(resource);
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    async fn fetch_games(&self) -> Result<Value, FetchError> {
        self.get_json(Resource::Games).await
    }

    async fn fetch_systems(&self) -> Result<Value, FetchError> {
        self.get_json(Resource::Systems).await
    }
}

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

/// Serves fixed payloads from memory, optionally after a delay or as a
/// failure. Stands in for the data service in tests and demos.
#[derive(Debug, Clone)]
pub struct StaticSource {
    games: Result<Value, String>,
    systems: Result<Value, String>,
    games_delay: Duration,
    systems_delay: Duration,
}

impl StaticSource {
    pub fn new(systems: Value, games: Value) -> Self {
        Self {
            games: Ok(games),
            systems: Ok(systems),
            games_delay: Duration::ZERO,
            systems_delay: Duration::ZERO,
        }
    }

    /// Make `resource` fail with `message`.
    pub fn failing(mut self, resource: Resource, message: &str) -> Self {
        match resource {
            Resource::Games => self.games = Err(message.to_string()),
            Resource::Systems => self.systems = Err(message.to_string()),
        }
        self
    }

    /// Answer `resource` only after `delay`.
    pub fn delayed(mut self, resource: Resource, delay: Duration) -> Self {
        match resource {
            Resource::Games => self.games_delay = delay,
            Resource::Systems => self.systems_delay = delay,
        }
        self
    }

    async fn serve(payload: &Result<Value, String>, delay: Duration) -> Result<Value, FetchError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        payload.clone().map_err(FetchError::Unavailable)
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch_games(&self) -> Result<Value, FetchError> {
        Self::serve(&self.games, self.games_delay).await
    }

    async fn fetch_systems(&self) -> Result<Value, FetchError> {
        Self::serve(&self.systems, self.systems_delay).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_urls_join_base_and_paths() {
        let source = HttpSource::new(&SourceConfig {
            base_url: "http://catalog.local:8080/api/".into(),
            games_path: "/games".into(),
            systems_path: "/systems".into(),
        });
        assert_eq!(source.url(Resource::Games), "http://catalog.local:8080/api/games");
        assert_eq!(source.url(Resource::Systems), "http://catalog.local:8080/api/systems");
    }

    #[tokio::test]
    async fn static_source_serves_payloads() {
        let source = StaticSource::new(json!([{ "id": 1 }]), json!([]));
        assert_eq!(source.fetch_systems().await.unwrap(), json!([{ "id": 1 }]));
        assert_eq!(source.fetch_games().await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn static_source_failure() {
        let source = StaticSource::new(json!([]), json!([])).failing(Resource::Games, "gone");
        let err = source.fetch_games().await.unwrap_err();
        assert_eq!(err.to_string(), "gone");
        assert!(source.fetch_systems().await.is_ok());
    }

    #[test]
    fn resource_names() {
        assert_eq!(Resource::Games.to_string(), "games");
        assert_eq!(Resource::Systems.to_string(), "systems");
    }
}

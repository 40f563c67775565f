// Configuration loading and parsing (gamecat.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "gamecat.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// gamecat.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Where the `/games` and `/systems` payloads come from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    #[serde(default = "default_games_path")]
    pub games_path: String,
    #[serde(default = "default_systems_path")]
    pub systems_path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_start_fragment")]
    pub start_fragment: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            start_fragment: default_start_fragment(),
        }
    }
}

fn default_games_path() -> String {
    "/games".into()
}

fn default_systems_path() -> String {
    "/systems".into()
}

fn default_start_fragment() -> String {
    "#/index".into()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/gamecat.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/gamecat.toml` from `defaults/gamecat.toml` when it is missing.
/// Returns the path written, or `None` when nothing needed copying. An
/// existing config is never touched.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if !default.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in config/ or defaults/ under {}",
                base_dir.display()
            ),
        });
    }

    let copy_error = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to seed {}: {e}", target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_error)?;
    }
    std::fs::copy(&default, &target).map_err(copy_error)?;

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    match reqwest::Url::parse(&config.source.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(ConfigError::ValidationError {
                field: "source.base_url".into(),
                message: format!("scheme must be http or https, got {}", url.scheme()),
            });
        }
        Err(e) => {
            return Err(ConfigError::ValidationError {
                field: "source.base_url".into(),
                message: format!("not a valid URL: {e}"),
            });
        }
    }

    let paths: &[(&str, &str)] = &[
        ("source.games_path", config.source.games_path.as_str()),
        ("source.systems_path", config.source.systems_path.as_str()),
    ];
    for (name, val) in paths {
        if !val.starts_with('/') {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must start with '/', got {val:?}"),
            });
        }
    }

    if config.navigation.start_fragment.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "navigation.start_fragment".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

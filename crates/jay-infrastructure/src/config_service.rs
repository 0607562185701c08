//! Loads `AppConfig` from TOML and layers environment overrides on top.
//!
//! Precedence, lowest first: built-in defaults, `config.toml`, environment
//! variables (`JAY_ENDPOINT`, `JAY_MODEL`, `JAY_LOG`). Command-line flags are
//! applied by the binary afterwards.

use jay_core::config::AppConfig;
use jay_core::{JayError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_ENDPOINT: &str = "JAY_ENDPOINT";
pub const ENV_MODEL: &str = "JAY_MODEL";
pub const ENV_LOG: &str = "JAY_LOG";

/// Reads the application configuration from a single TOML file.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config file.
    ///
    /// A missing or blank file yields the defaults; a malformed one is an
    /// error rather than a silent fallback.
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            JayError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if config.relay.endpoint.trim().is_empty() {
            return Err(JayError::config("relay.endpoint must not be empty"));
        }

        tracing::info!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads the file and applies overrides from the process environment.
    pub fn load_with_env(&self) -> Result<AppConfig> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }
}

/// Applies environment overrides read through `lookup`.
///
/// Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(endpoint) = non_blank(ENV_ENDPOINT) {
        config.relay.endpoint = endpoint;
    }
    if let Some(model) = non_blank(ENV_MODEL) {
        config.relay.model = model;
    }
    if let Some(level) = non_blank(ENV_LOG) {
        config.logging.level = level;
    }
}

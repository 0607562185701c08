//! Path management for jay configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/jay/               # Config directory
//! ├── config.toml              # Application configuration
//! ├── history.txt              # Readline input history
//! └── logs/                    # Application logs
//!     └── jay.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Error, Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolves jay's files, either under the user's home or under an explicit
/// base directory (used by tests and `--config-dir`).
#[derive(Debug, Clone, Default)]
pub struct JayPaths {
    base_dir: Option<PathBuf>,
}

impl JayPaths {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the configuration directory (`~/.config/jay` by default).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("jay"))
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn history_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("history.txt"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

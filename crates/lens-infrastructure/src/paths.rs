//! Path management for VentureLens client files.
//!
//! ```text
//! ~/.config/venturelens/       # Config directory (platform equivalent elsewhere)
//! ├── config.toml              # Backend endpoints and access gate settings
//! └── session_token.json       # Last acquired bearer token
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "venturelens";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for lens_core::LensError {
    fn from(err: PathError) -> Self {
        lens_core::LensError::config(err.to_string())
    }
}

/// Resolves the files the client keeps on disk.
///
/// `LensPaths::new(None)` uses the platform config directory; tests pass an
/// explicit base directory instead.
#[derive(Debug, Clone)]
pub struct LensPaths {
    base: Option<PathBuf>,
}

impl LensPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the client configuration directory (e.g. `~/.config/venturelens/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// The single durable token slot.
    pub fn token_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session_token.json"))
    }
}

impl Default for LensPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

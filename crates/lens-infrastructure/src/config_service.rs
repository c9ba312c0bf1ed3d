//! Configuration service implementation.
//!
//! Loads [`LensConfig`] from `config.toml` and applies environment overrides.
//!
//! Priority: environment variables > config.toml > built-in defaults.

use crate::paths::LensPaths;
use lens_core::{LensConfig, LensError, Result};
use std::fs;

/// Overrides `api.base_url`.
pub const ENV_API_URL: &str = "VENTURELENS_API_URL";
/// Overrides `access.enabled` (`true`/`false`/`1`/`0`).
pub const ENV_ACCESS_ENABLED: &str = "VENTURELENS_ACCESS_ENABLED";

#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    paths: LensPaths,
}

impl ConfigService {
    pub fn new(paths: LensPaths) -> Self {
        Self { paths }
    }

    /// Loads the configuration using the process environment for overrides.
    pub fn load(&self) -> Result<LensConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads the configuration, resolving overrides through `lookup`.
    pub fn load_with_env<F>(&self, lookup: F) -> Result<LensConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, lookup)?;
        Ok(config)
    }

    fn load_file(&self) -> Result<LensConfig> {
        let path = self.paths.config_file()?;

        if !path.exists() {
            tracing::debug!(
                "[Config] No config file at {}, using defaults",
                path.display()
            );
            return Ok(LensConfig::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(LensConfig::default());
        }

        let config: LensConfig = toml::from_str(&content)?;
        tracing::info!("[Config] Loaded configuration from {}", path.display());
        Ok(config)
    }
}

fn apply_env_overrides<F>(config: &mut LensConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_ACCESS_ENABLED) {
        config.access.enabled = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(LensError::config(format!(
                    "{} must be a boolean, got '{}'",
                    ENV_ACCESS_ENABLED, other
                )));
            }
        };
    }

    Ok(())
}

//! Configuration service implementation.
//!
//! Loads [`RunConfig`] from `config.toml` (an explicit path or
//! `~/.config/okra/config.toml`) and fills unset connection settings from
//! the environment. Values from the file win over the environment.

use crate::paths::OkraPaths;
use okra_core::{OkraError, Result, RunConfig};
use std::path::{Path, PathBuf};

pub const ENV_BASE_URL: &str = "OKRA_BASE_URL";
pub const ENV_API_TOKEN: &str = "OKRA_API_TOKEN";
pub const ENV_ACCOUNT_ID: &str = "OKRA_ACCOUNT_ID";

/// Loads run configuration from file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    /// Explicit config file. `None` means the platform default location.
    path: Option<PathBuf>,
}

impl ConfigService {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Loads the configuration using the process environment.
    pub fn load(&self) -> Result<RunConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads the configuration with an injectable environment lookup.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just yields defaults.
    pub fn load_with_env<F>(&self, env: F) -> Result<RunConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.path {
            Some(path) => {
                if !path.exists() {
                    return Err(OkraError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::read_file(path)?
            }
            None => match OkraPaths::config_file() {
                Ok(path) if path.exists() => Self::read_file(&path)?,
                Ok(path) => {
                    tracing::debug!(
                        "[ConfigService] No config file at {}, using defaults",
                        path.display()
                    );
                    RunConfig::default()
                }
                Err(e) => {
                    tracing::debug!("[ConfigService] {}", e);
                    RunConfig::default()
                }
            },
        };

        Self::apply_env(&mut config, env);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<RunConfig> {
        tracing::debug!("[ConfigService] Loading {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: RunConfig = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env<F>(config: &mut RunConfig, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if config.api.base_url.trim().is_empty() {
            if let Some(url) = present(ENV_BASE_URL) {
                config.api.base_url = url;
            }
        }
        if config.api.token.as_deref().is_none_or(|t| t.trim().is_empty()) {
            config.api.token = present(ENV_API_TOKEN);
        }
        if config
            .api
            .account_id
            .as_deref()
            .is_none_or(|a| a.trim().is_empty())
        {
            config.api.account_id = present(ENV_ACCOUNT_ID);
        }
    }
}

pub mod aggregate;
pub mod render;
pub mod sessions;

use anyhow::{Context, Result};
use okra_core::RunConfig;
use okra_infrastructure::{ConfigService, RemoteClient};
use std::path::PathBuf;
use std::sync::Arc;

/// Loads configuration from file and environment.
pub fn load_config(path: Option<PathBuf>) -> Result<RunConfig> {
    ConfigService::new(path)
        .load()
        .context("Failed to load configuration")
}

/// Builds the HTTP client for `config`.
pub fn remote_client(config: &RunConfig) -> Result<Arc<RemoteClient>> {
    let client = RemoteClient::new(&config.api, &config.batch)
        .context("Failed to create the remote client")?;
    Ok(Arc::new(client))
}

//! Path management for okra configuration files.
//!
//! ```text
//! ~/.config/okra/          # Config directory (platform config dir)
//! └── config.toml          # Run configuration
//! ```

use okra_core::{OkraError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "okra";
const CONFIG_FILE: &str = "config.toml";

/// Resolves okra's on-disk locations.
pub struct OkraPaths;

impl OkraPaths {
    /// Returns the okra configuration directory (e.g. `~/.config/okra/`).
    ///
    /// # Errors
    ///
    /// Returns `Config` when the platform config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| OkraError::config("Cannot determine the user configuration directory"))
    }

    /// Returns the path to the default `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}

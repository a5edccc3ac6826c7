// zfsctl-core/src/config.rs

//! Handles configuration structures and parsing for the library.

use crate::errors::{Result, ZfsError};
use serde::Deserialize;
use std::path::PathBuf;

/// Ceiling applied to each of stdout and stderr of a single invocation.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 8_000_000;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ZfsctlConfig {
    /// Explicit path to the `zfs` binary. Skips the search-path lookup when set.
    #[serde(default)]
    pub zfs_path: Option<PathBuf>,
    /// Explicit path to the `zpool` binary.
    #[serde(default)]
    pub zpool_path: Option<PathBuf>,
    /// Directory list used instead of `PATH` when locating binaries.
    #[serde(default)]
    pub search_path: Option<Vec<PathBuf>>,
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

fn default_max_output_bytes() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

impl Default for ZfsctlConfig {
    fn default() -> Self {
        Self {
            zfs_path: None,
            zpool_path: None,
            search_path: None,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl ZfsctlConfig {
    pub fn from_toml_str(config_toml_content: &str) -> Result<ZfsctlConfig> {
        let config: ZfsctlConfig = match toml::from_str(config_toml_content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse TOML content");
                return Err(ZfsError::config(format!(
                    "Failed to parse configuration TOML content: {}",
                    e
                )));
            }
        };

        if config.max_output_bytes == 0 {
            return Err(ZfsError::config("'max_output_bytes' must be greater than zero."));
        }
        for (key, path) in [("zfs_path", &config.zfs_path), ("zpool_path", &config.zpool_path)] {
            if let Some(path) = path {
                if path.as_os_str().is_empty() {
                    return Err(ZfsError::config(format!("'{}' is empty.", key)));
                }
            }
        }
        if let Some(dirs) = &config.search_path {
            if dirs.is_empty() {
                return Err(ZfsError::config(
                    "'search_path' is empty; remove it to fall back to PATH.",
                ));
            }
        }

        tracing::info!("Successfully parsed and validated zfsctl configuration.");
        Ok(config)
    }
}

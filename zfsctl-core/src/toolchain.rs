// zfsctl-core/src/toolchain.rs

//! Resolved locations of the `zfs` and `zpool` binaries.
//!
//! Resolution happens once; the resulting [`Toolchain`] is immutable and shared
//! by `Arc` between clients. A binary that disappears after resolution makes
//! later invocations fail at spawn time rather than being looked up again.

use crate::config::ZfsctlConfig;
use crate::errors::{Result, ZfsError};
use crate::locate::{locate, locate_in};
use lazy_static::lazy_static;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

lazy_static! {
    static ref SYSTEM_TOOLCHAIN: Arc<Toolchain> = Arc::new(Toolchain::discover());
}

/// The external executables this crate drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executable {
    /// The filesystem manager.
    Zfs,
    /// The pool manager.
    Zpool,
}

impl Executable {
    pub fn name(self) -> &'static str {
        match self {
            Executable::Zfs => "zfs",
            Executable::Zpool => "zpool",
        }
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toolchain {
    zfs: Option<PathBuf>,
    zpool: Option<PathBuf>,
}

impl Toolchain {
    pub fn new(zfs: Option<PathBuf>, zpool: Option<PathBuf>) -> Self {
        Self { zfs, zpool }
    }

    /// Locates both binaries on the process `PATH`.
    pub fn discover() -> Self {
        let toolchain = Self {
            zfs: locate(Executable::Zfs.name()),
            zpool: locate(Executable::Zpool.name()),
        };
        toolchain.log_resolution();
        toolchain
    }

    /// Process-wide toolchain, discovered on first use and reused afterwards.
    pub fn system() -> Arc<Toolchain> {
        Arc::clone(&SYSTEM_TOOLCHAIN)
    }

    /// Explicit paths from the config win; otherwise the configured
    /// `search_path` (or `PATH` when absent) is scanned.
    pub fn from_config(config: &ZfsctlConfig) -> Self {
        let search_path = match &config.search_path {
            Some(dirs) => match env::join_paths(dirs) {
                Ok(joined) => Some(joined),
                Err(e) => {
                    warn!(error = %e, "Configured search_path contains an invalid entry; using PATH");
                    None
                }
            },
            None => None,
        };
        let resolve = |explicit: &Option<PathBuf>, tool: Executable| {
            explicit.clone().or_else(|| match &search_path {
                Some(dirs) => locate_in(tool.name(), dirs),
                None => locate(tool.name()),
            })
        };
        let toolchain = Self {
            zfs: resolve(&config.zfs_path, Executable::Zfs),
            zpool: resolve(&config.zpool_path, Executable::Zpool),
        };
        toolchain.log_resolution();
        toolchain
    }

    pub fn zfs(&self) -> Option<&Path> {
        self.zfs.as_deref()
    }

    pub fn zpool(&self) -> Option<&Path> {
        self.zpool.as_deref()
    }

    /// Path for `tool`, or [`ZfsError::ExecutableNotFound`] if it was never resolved.
    pub fn path_for(&self, tool: Executable) -> Result<&Path> {
        let path = match tool {
            Executable::Zfs => self.zfs(),
            Executable::Zpool => self.zpool(),
        };
        path.ok_or_else(|| ZfsError::ExecutableNotFound {
            name: tool.name().to_string(),
        })
    }

    fn log_resolution(&self) {
        for (tool, path) in [(Executable::Zfs, &self.zfs), (Executable::Zpool, &self.zpool)] {
            match path {
                Some(path) => info!(%tool, path = %path.display(), "Resolved executable"),
                None => warn!(%tool, "Executable not found; operations using it will fail"),
            }
        }
    }
}

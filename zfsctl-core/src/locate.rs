// zfsctl-core/src/locate.rs

//! Resolves an executable name to an absolute path by scanning a search path.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Searches the directories in the process `PATH` for a file named `name`.
///
/// Returns `None` when `PATH` is unset or no listed directory contains the file.
pub fn locate(name: &str) -> Option<PathBuf> {
    match env::var_os("PATH") {
        Some(search_path) => locate_in(name, &search_path),
        None => {
            debug!(name, "PATH is not set; cannot locate executable");
            None
        }
    }
}

/// Same as [`locate`] but scans an explicit search path, split with the
/// platform path separator (`:` on Unix, `;` on Windows).
pub fn locate_in(name: &str, search_path: impl AsRef<OsStr>) -> Option<PathBuf> {
    for dir in env::split_paths(search_path.as_ref()) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = absolute(&dir).join(name);
        trace!("Checking for {} at {:?}", name, candidate);
        if candidate.is_file() {
            debug!(name, path = %candidate.display(), "Located executable");
            return Some(candidate);
        }
    }
    debug!(name, "Executable not found on search path");
    None
}

fn absolute(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}

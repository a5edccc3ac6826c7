// zfsctl-core/src/lib.rs

//! Async wrapper around the `zfs` and `zpool` command-line tools.
//!
//! [`ZfsClient`] and [`ZpoolClient`] turn typed requests into argument vectors,
//! run the resolved binary as a child process and parse its scripted
//! (`-H -p`, tab-delimited) output into records.
//!
//! ```no_run
//! use std::sync::Arc;
//! use zfsctl_core::{ListOptions, ProcessRunner, SnapshotOptions, Toolchain, ZfsClient};
//!
//! # async fn demo() -> zfsctl_core::Result<()> {
//! let toolchain = Arc::new(Toolchain::discover());
//! let zfs = ZfsClient::new(toolchain, Arc::new(ProcessRunner::default()));
//!
//! for dataset in zfs.list(&ListOptions::default()).await? {
//!     println!("{} uses {} bytes", dataset.name, dataset.used);
//! }
//! zfs.snapshot(&SnapshotOptions {
//!     dataset: "tank/data".into(),
//!     name: "daily".into(),
//!     recursive: false,
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod errors;
pub mod locate;
pub mod models;
pub mod options;
pub mod size;
pub mod toolchain;
pub mod utils;
pub mod zfs;
pub mod zpool;

#[cfg(test)]
mod client_tests;

pub use command::{CommandOutput, CommandRunner, ProcessRunner};
pub use config::ZfsctlConfig;
pub use errors::{Result, ZfsError};
pub use locate::{locate, locate_in};
pub use models::{Dataset, DatasetKind, Pool, PoolHealth, Property, PropertySource};
pub use options::{DeviceSpec, GetOptions, PropertyAssignment, SetOptions};
pub use size::parse_size;
pub use toolchain::{Executable, Toolchain};
pub use zfs::{CloneOptions, CreateOptions, DestroyOptions, ListOptions, SnapshotOptions, ZfsClient};
pub use zpool::{PoolAddOptions, PoolCreateOptions, PoolDestroyOptions, PoolListOptions, ZpoolClient};

pub use async_trait::async_trait;

use std::sync::Arc;

/// Builds both clients from one configuration, sharing a single resolved
/// [`Toolchain`] and [`ProcessRunner`].
pub fn clients_from_config(config: &ZfsctlConfig) -> (ZfsClient, ZpoolClient) {
    let toolchain = Arc::new(Toolchain::from_config(config));
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new(config.max_output_bytes));
    (
        ZfsClient::new(Arc::clone(&toolchain), Arc::clone(&runner)),
        ZpoolClient::new(toolchain, runner),
    )
}

// zfsctl-core/src/zpool.rs

//! Pool client: builds `zpool` argument vectors and parses their output.

use crate::command::{run_checked, CommandRunner, ProcessRunner};
use crate::errors::{Result, ZfsError};
use crate::models::pool::POOL_COLUMNS;
use crate::models::{parse_records, Pool, Property};
use crate::options::{push_assignments, DeviceSpec, GetOptions, PropertyAssignment, SetOptions};
use crate::toolchain::{Executable, Toolchain};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolListOptions {
    /// Restrict the listing to one pool.
    pub name: Option<String>,
}

impl PoolListOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "list".to_string(),
            "-H".to_string(),
            "-p".to_string(),
            "-o".to_string(),
            POOL_COLUMNS.to_string(),
        ];
        if let Some(name) = &self.name {
            args.push(name.clone());
        }
        args
    }
}

/// `zpool destroy` always forces (`-f`), unmounting active datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDestroyOptions {
    pub name: String,
}

impl PoolDestroyOptions {
    pub fn args(&self) -> Vec<String> {
        vec!["destroy".to_string(), "-f".to_string(), self.name.clone()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolCreateOptions {
    pub name: String,
    /// Vdev layout, topology keyword first: `mirror /dev/a /dev/b`.
    pub devices: DeviceSpec,
    pub options: Vec<PropertyAssignment>,
    pub mountpoint: Option<String>,
}

impl PoolCreateOptions {
    pub fn args(&self) -> Result<Vec<String>> {
        require_devices(&self.name, &self.devices)?;
        let mut args = vec!["create".to_string(), "-f".to_string()];
        push_assignments(&mut args, &self.options);
        if let Some(mountpoint) = &self.mountpoint {
            args.push("-m".to_string());
            args.push(mountpoint.clone());
        }
        args.push(self.name.clone());
        args.extend(self.devices.devices().iter().cloned());
        Ok(args)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolAddOptions {
    pub name: String,
    pub devices: DeviceSpec,
}

impl PoolAddOptions {
    pub fn args(&self) -> Result<Vec<String>> {
        require_devices(&self.name, &self.devices)?;
        let mut args = vec!["add".to_string(), "-f".to_string(), self.name.clone()];
        args.extend(self.devices.devices().iter().cloned());
        Ok(args)
    }
}

fn require_devices(pool: &str, devices: &DeviceSpec) -> Result<()> {
    if devices.is_empty() {
        return Err(ZfsError::invalid_request(format!(
            "no devices given for pool '{}'",
            pool
        )));
    }
    Ok(())
}

/// Async client for `zpool`. Cheap to clone; clones share the toolchain and runner.
#[derive(Clone)]
pub struct ZpoolClient {
    toolchain: Arc<Toolchain>,
    runner: Arc<dyn CommandRunner>,
}

impl ZpoolClient {
    pub fn new(toolchain: Arc<Toolchain>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { toolchain, runner }
    }

    pub fn system() -> Self {
        Self::new(Toolchain::system(), Arc::new(ProcessRunner::default()))
    }

    async fn exec(&self, args: &[String]) -> Result<String> {
        let program = self.toolchain.path_for(Executable::Zpool)?;
        run_checked(self.runner.as_ref(), program, args).await
    }

    pub async fn list(&self, options: &PoolListOptions) -> Result<Vec<Pool>> {
        let stdout = self.exec(&options.args()).await?;
        Ok(parse_records(&stdout, "pool", Pool::from_line))
    }

    pub async fn get(&self, options: &GetOptions) -> Result<Vec<Property>> {
        let stdout = self.exec(&options.args()).await?;
        Ok(parse_records(&stdout, "property", Property::from_line))
    }

    pub async fn set(&self, options: &SetOptions) -> Result<()> {
        info!(pool = %options.name, property = %options.property, value = %options.value, "Setting pool property");
        self.exec(&options.args()).await.map(|_| ())
    }

    pub async fn destroy(&self, options: &PoolDestroyOptions) -> Result<()> {
        info!(pool = %options.name, "Destroying pool");
        self.exec(&options.args()).await.map(|_| ())
    }

    pub async fn create(&self, options: &PoolCreateOptions) -> Result<()> {
        let args = options.args()?;
        info!(pool = %options.name, devices = ?options.devices.devices(), "Creating pool");
        self.exec(&args).await.map(|_| ())
    }

    /// `zpool add`: attaches more vdevs to an existing pool.
    pub async fn add(&self, options: &PoolAddOptions) -> Result<()> {
        let args = options.args()?;
        info!(pool = %options.name, devices = ?options.devices.devices(), "Adding devices to pool");
        self.exec(&args).await.map(|_| ())
    }
}

// zfsctl-core/src/zfs.rs

//! Dataset client: builds `zfs` argument vectors and parses their output.

use crate::command::{run_checked, CommandRunner, ProcessRunner};
use crate::errors::{Result, ZfsError};
use crate::models::dataset::DATASET_COLUMNS;
use crate::models::{parse_records, Dataset, DatasetKind, Property};
use crate::options::{push_assignments, GetOptions, PropertyAssignment, SetOptions};
use crate::size::parse_size;
use crate::toolchain::{Executable, Toolchain};
use std::sync::Arc;
use tracing::info;

/// Options for `zfs list`. All fields are optional; the default lists every
/// filesystem and volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub kind: Option<DatasetKind>,
    /// Property to sort by (ascending), passed with `-s`.
    pub sort: Option<String>,
    pub recursive: bool,
    pub target: Option<String>,
}

impl ListOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "list".to_string(),
            "-H".to_string(),
            "-p".to_string(),
            "-o".to_string(),
            DATASET_COLUMNS.to_string(),
        ];
        if let Some(kind) = self.kind {
            args.push("-t".to_string());
            args.push(kind.to_string());
        }
        if let Some(sort) = &self.sort {
            args.push("-s".to_string());
            args.push(sort.clone());
        }
        if self.recursive {
            args.push("-r".to_string());
        }
        if let Some(target) = &self.target {
            args.push(target.clone());
        }
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyOptions {
    pub name: String,
    /// Also destroy all descendants (`-r`).
    pub recursive: bool,
}

impl DestroyOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["destroy".to_string()];
        if self.recursive {
            args.push("-r".to_string());
        }
        args.push(self.name.clone());
        args
    }
}

/// Options for `zfs create`. Setting `size` creates a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub name: String,
    pub options: Vec<PropertyAssignment>,
    /// Volume size such as `10G`; validated and passed as exact bytes with `-V`.
    pub size: Option<String>,
}

impl CreateOptions {
    pub fn args(&self) -> Result<Vec<String>> {
        let mut args = vec!["create".to_string()];
        push_assignments(&mut args, &self.options);
        if let Some(size) = &self.size {
            let bytes = parse_size(size).ok_or_else(|| ZfsError::InvalidSize(size.clone()))?;
            args.push("-V".to_string());
            args.push(bytes.to_string());
        }
        args.push(self.name.clone());
        Ok(args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub dataset: String,
    pub name: String,
    /// Snapshot every descendant as well (`-r`).
    pub recursive: bool,
}

impl SnapshotOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["snapshot".to_string()];
        if self.recursive {
            args.push("-r".to_string());
        }
        args.push(format!("{}@{}", self.dataset, self.name));
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    /// Source snapshot, `pool/path@snapname`.
    pub snapshot: String,
    /// Destination dataset path.
    pub dataset: String,
}

impl CloneOptions {
    pub fn args(&self) -> Vec<String> {
        vec!["clone".to_string(), self.snapshot.clone(), self.dataset.clone()]
    }
}

/// Async client for `zfs`. Cheap to clone; clones share the toolchain and runner.
#[derive(Clone)]
pub struct ZfsClient {
    toolchain: Arc<Toolchain>,
    runner: Arc<dyn CommandRunner>,
}

impl ZfsClient {
    pub fn new(toolchain: Arc<Toolchain>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { toolchain, runner }
    }

    /// Client using the process-wide toolchain and a default [`ProcessRunner`].
    pub fn system() -> Self {
        Self::new(Toolchain::system(), Arc::new(ProcessRunner::default()))
    }

    async fn exec(&self, args: &[String]) -> Result<String> {
        let program = self.toolchain.path_for(Executable::Zfs)?;
        run_checked(self.runner.as_ref(), program, args).await
    }

    /// `zfs list`: one [`Dataset`] per output line, in output order.
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<Dataset>> {
        let stdout = self.exec(&options.args()).await?;
        Ok(parse_records(&stdout, "dataset", Dataset::from_line))
    }

    /// `zfs get`: one [`Property`] per output line.
    pub async fn get(&self, options: &GetOptions) -> Result<Vec<Property>> {
        let stdout = self.exec(&options.args()).await?;
        Ok(parse_records(&stdout, "property", Property::from_line))
    }

    pub async fn set(&self, options: &SetOptions) -> Result<()> {
        info!(dataset = %options.name, property = %options.property, value = %options.value, "Setting dataset property");
        self.exec(&options.args()).await.map(|_| ())
    }

    pub async fn destroy(&self, options: &DestroyOptions) -> Result<()> {
        info!(dataset = %options.name, recursive = options.recursive, "Destroying dataset");
        self.exec(&options.args()).await.map(|_| ())
    }

    /// `zfs create`. An invalid `size` fails before anything is spawned.
    pub async fn create(&self, options: &CreateOptions) -> Result<()> {
        let args = options.args()?;
        info!(dataset = %options.name, "Creating dataset");
        self.exec(&args).await.map(|_| ())
    }

    pub async fn snapshot(&self, options: &SnapshotOptions) -> Result<()> {
        info!(dataset = %options.dataset, snapshot = %options.name, recursive = options.recursive, "Taking snapshot");
        self.exec(&options.args()).await.map(|_| ())
    }

    /// `zfs clone`. Named `clone_snapshot` so it does not shadow [`Clone::clone`].
    pub async fn clone_snapshot(&self, options: &CloneOptions) -> Result<()> {
        info!(snapshot = %options.snapshot, dataset = %options.dataset, "Cloning snapshot");
        self.exec(&options.args()).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_default() {
        assert_eq!(
            ListOptions::default().args(),
            ["list", "-H", "-p", "-o", "name,used,avail,refer,mountpoint"]
        );
    }

    #[test]
    fn test_list_args_all_options() {
        let options = ListOptions {
            kind: Some(DatasetKind::Snapshot),
            sort: Some("creation".to_string()),
            recursive: true,
            target: Some("tank/data".to_string()),
        };
        assert_eq!(
            options.args(),
            [
                "list", "-H", "-p", "-o", "name,used,avail,refer,mountpoint",
                "-t", "snapshot", "-s", "creation", "-r", "tank/data"
            ]
        );
    }

    #[test]
    fn test_destroy_args() {
        let plain = DestroyOptions { name: "tank/old".to_string(), recursive: false };
        assert_eq!(plain.args(), ["destroy", "tank/old"]);
        let recursive = DestroyOptions { recursive: true, ..plain };
        assert_eq!(recursive.args(), ["destroy", "-r", "tank/old"]);
    }

    #[test]
    fn test_create_args_order() {
        let options = CreateOptions {
            name: "tank/vol".to_string(),
            options: vec![
                PropertyAssignment::new("compression", "lz4"),
                PropertyAssignment::new("volblocksize", "16K"),
            ],
            size: Some("10G".to_string()),
        };
        assert_eq!(
            options.args().unwrap(),
            [
                "create", "-o", "compression=lz4", "-o", "volblocksize=16K",
                "-V", "10737418240", "tank/vol"
            ]
        );
    }

    #[test]
    fn test_create_args_single_assignment_without_size() {
        let options = CreateOptions {
            name: "tank/home".to_string(),
            options: vec![PropertyAssignment::new("mountpoint", "/home")],
            size: None,
        };
        assert_eq!(options.args().unwrap(), ["create", "-o", "mountpoint=/home", "tank/home"]);
    }

    #[test]
    fn test_create_args_invalid_size() {
        let options = CreateOptions {
            name: "tank/vol".to_string(),
            size: Some("ten gigs".to_string()),
            ..CreateOptions::default()
        };
        match options.args() {
            Err(ZfsError::InvalidSize(size)) => assert_eq!(size, "ten gigs"),
            other => panic!("expected InvalidSize, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_args() {
        let options = SnapshotOptions {
            dataset: "tank/data".to_string(),
            name: "daily".to_string(),
            recursive: false,
        };
        assert_eq!(options.args(), ["snapshot", "tank/data@daily"]);
        let recursive = SnapshotOptions { recursive: true, ..options };
        assert_eq!(recursive.args(), ["snapshot", "-r", "tank/data@daily"]);
    }

    #[test]
    fn test_clone_args() {
        let options = CloneOptions {
            snapshot: "tank/data@daily".to_string(),
            dataset: "tank/restore".to_string(),
        };
        assert_eq!(options.args(), ["clone", "tank/data@daily", "tank/restore"]);
    }

    #[test]
    fn test_system_client_shares_process_toolchain() {
        let first = ZfsClient::system();
        let second = ZfsClient::system();
        assert!(Arc::ptr_eq(&first.toolchain, &Toolchain::system()));
        assert!(Arc::ptr_eq(&first.toolchain, &second.toolchain));
    }
}

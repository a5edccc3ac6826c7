// zfsctl-core/src/models/dataset.rs
use super::optional_size;
use crate::size::parse_size;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Columns requested from `zfs list`, in the order [`Dataset::from_line`] reads them.
pub const DATASET_COLUMNS: &str = "name,used,avail,refer,mountpoint";

/// One row of `zfs list`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub used: u64,
    /// Absent for snapshots, which have no available space of their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avail: Option<u64>,
    pub refer: u64,
    /// `-` when the dataset is not mountable (snapshots, volumes).
    pub mountpoint: String,
}

impl Dataset {
    /// Parses one tab-delimited line of exactly five fields.
    pub fn from_line(line: &str) -> Option<Dataset> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 5 {
            return None;
        }
        Some(Dataset {
            name: fields[0].to_string(),
            used: parse_size(fields[1])?,
            avail: optional_size(fields[2])?,
            refer: parse_size(fields[3])?,
            mountpoint: fields[4].to_string(),
        })
    }

    pub fn is_snapshot(&self) -> bool {
        self.name.contains('@')
    }
}

/// Dataset type filter for `zfs list -t`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Filesystem,
    Volume,
    Snapshot,
    Bookmark,
    All,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Filesystem => "filesystem",
            DatasetKind::Volume => "volume",
            DatasetKind::Snapshot => "snapshot",
            DatasetKind::Bookmark => "bookmark",
            DatasetKind::All => "all",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

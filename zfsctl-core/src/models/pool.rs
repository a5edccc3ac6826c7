// zfsctl-core/src/models/pool.rs
use super::{optional_size, PLACEHOLDER};
use serde::{Serialize, Serializer};
use std::fmt;

/// Columns requested from `zpool list`. Pinning them keeps the row at seven
/// fields regardless of which extra columns the installed `zpool` shows by default.
pub const POOL_COLUMNS: &str = "name,size,alloc,free,cap,health,altroot";

/// One row of `zpool list`.
///
/// Sizes are `None` when the pool reports `-` (e.g. an unavailable pool).
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub name: String,
    pub size: Option<u64>,
    pub alloc: Option<u64>,
    pub free: Option<u64>,
    /// Percentage of the pool in use.
    pub capacity: Option<u64>,
    pub health: PoolHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altroot: Option<String>,
}

impl Pool {
    pub fn from_line(line: &str) -> Option<Pool> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 7 {
            return None;
        }
        Some(Pool {
            name: fields[0].to_string(),
            size: optional_size(fields[1])?,
            alloc: optional_size(fields[2])?,
            free: optional_size(fields[3])?,
            capacity: parse_capacity(fields[4])?,
            health: PoolHealth::parse(fields[5]),
            altroot: match fields[6] {
                PLACEHOLDER => None,
                root => Some(root.to_string()),
            },
        })
    }
}

/// `12` (parsable mode) or `12%`; `-` yields `Some(None)`.
fn parse_capacity(field: &str) -> Option<Option<u64>> {
    if field == PLACEHOLDER {
        return Some(None);
    }
    field.trim_end_matches('%').parse::<u64>().ok().map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolHealth {
    Online,
    Degraded,
    Faulted,
    Offline,
    Unavail,
    Removed,
    Suspended,
    Other(String),
}

impl PoolHealth {
    pub fn parse(text: &str) -> PoolHealth {
        match text {
            "ONLINE" => PoolHealth::Online,
            "DEGRADED" => PoolHealth::Degraded,
            "FAULTED" => PoolHealth::Faulted,
            "OFFLINE" => PoolHealth::Offline,
            "UNAVAIL" => PoolHealth::Unavail,
            "REMOVED" => PoolHealth::Removed,
            "SUSPENDED" => PoolHealth::Suspended,
            other => PoolHealth::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PoolHealth::Online => "ONLINE",
            PoolHealth::Degraded => "DEGRADED",
            PoolHealth::Faulted => "FAULTED",
            PoolHealth::Offline => "OFFLINE",
            PoolHealth::Unavail => "UNAVAIL",
            PoolHealth::Removed => "REMOVED",
            PoolHealth::Suspended => "SUSPENDED",
            PoolHealth::Other(s) => s,
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, PoolHealth::Online)
    }
}

impl fmt::Display for PoolHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PoolHealth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

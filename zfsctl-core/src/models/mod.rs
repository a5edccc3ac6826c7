// zfsctl-core/src/models/mod.rs

//! Records parsed from the scripted (`-H`, tab-delimited) output of `zfs` and `zpool`.
//!
//! Every record is built from exactly one output line. A line with the wrong
//! number of fields, or a numeric column that does not parse, produces no record.

pub mod dataset;
pub mod pool;
pub mod property;

pub use dataset::{Dataset, DatasetKind};
pub use pool::{Pool, PoolHealth};
pub use property::{Property, PropertySource};

use crate::size::parse_size;
use tracing::warn;

/// Column value `zfs`/`zpool` print when a field does not apply.
pub const PLACEHOLDER: &str = "-";

/// Parses every non-empty line of `stdout` with `parse_line`, in order.
///
/// Lines that do not yield a record are dropped and logged; the remaining lines
/// are still parsed.
pub(crate) fn parse_records<T>(stdout: &str, kind: &str, parse_line: fn(&str) -> Option<T>) -> Vec<T> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let record = parse_line(line);
            if record.is_none() {
                warn!(record = kind, line, "Dropping output line that does not match the expected columns");
            }
            record
        })
        .collect()
}

/// Size column that may hold the placeholder: `Some(None)` for `-`,
/// `Some(Some(n))` for a valid size, `None` when malformed.
fn optional_size(field: &str) -> Option<Option<u64>> {
    if field == PLACEHOLDER {
        return Some(None);
    }
    parse_size(field).map(Some)
}

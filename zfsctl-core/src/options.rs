// zfsctl-core/src/options.rs

//! Request types shared by the dataset and pool clients.

use crate::errors::{Result, ZfsError};
use crate::models::property::PROPERTY_COLUMNS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `property=value` pair passed with `-o` on create, or as the argument of `set`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PropertyAssignment {
    pub property: String,
    pub value: String,
}

impl PropertyAssignment {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PropertyAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.property, self.value)
    }
}

impl FromStr for PropertyAssignment {
    type Err = ZfsError;

    /// Splits on the first `=`, so values may themselves contain `=`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((property, value)) if !property.is_empty() => Ok(Self::new(property, value)),
            _ => Err(ZfsError::invalid_request(format!(
                "expected property=value, got '{}'",
                s
            ))),
        }
    }
}

/// Appends `-o property=value` for each assignment, in order.
pub(crate) fn push_assignments(args: &mut Vec<String>, assignments: &[PropertyAssignment]) {
    for assignment in assignments {
        args.push("-o".to_string());
        args.push(assignment.to_string());
    }
}

/// Ordered list of device paths for `zpool create` / `zpool add`.
///
/// A topology keyword (`mirror`, `raidz`, `spare`, `cache`, ...) is just another
/// entry, placed before the devices it groups.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSpec(Vec<String>);

impl DeviceSpec {
    pub fn new(devices: Vec<String>) -> Self {
        Self(devices)
    }

    /// Normalizes a whitespace-separated device string, e.g. `"mirror /dev/a /dev/b"`.
    pub fn parse(devices: &str) -> Self {
        Self(devices.split_whitespace().map(str::to_string).collect())
    }

    pub fn devices(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for DeviceSpec {
    fn from(devices: Vec<String>) -> Self {
        Self::new(devices)
    }
}

impl From<&str> for DeviceSpec {
    fn from(devices: &str) -> Self {
        Self::parse(devices)
    }
}

impl<S: Into<String>> FromIterator<S> for DeviceSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// `get` request shared by `zfs get` and `zpool get`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Property name (or a comma-separated list, or `all`).
    pub property: String,
    /// Source filter passed with `-s`, e.g. `local` or `local,inherited`.
    /// Only `zfs get` understands it; `zpool get` rejects `-s`.
    pub source: Option<String>,
    /// Dataset or pool to query; all of them when absent.
    pub target: Option<String>,
}

impl GetOptions {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ..Self::default()
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "get".to_string(),
            "-H".to_string(),
            "-p".to_string(),
            "-o".to_string(),
            PROPERTY_COLUMNS.to_string(),
        ];
        if let Some(source) = &self.source {
            args.push("-s".to_string());
            args.push(source.clone());
        }
        args.push(self.property.clone());
        if let Some(target) = &self.target {
            args.push(target.clone());
        }
        args
    }
}

/// `set` request shared by `zfs set` and `zpool set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOptions {
    pub name: String,
    pub property: String,
    pub value: String,
}

impl SetOptions {
    pub fn new(name: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "set".to_string(),
            format!("{}={}", self.property, self.value),
            self.name.clone(),
        ]
    }
}

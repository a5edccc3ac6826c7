// zfsctl-core/src/models/property.rs
use serde::{Serialize, Serializer};
use std::fmt;

/// Columns requested from `zfs get` / `zpool get`.
pub const PROPERTY_COLUMNS: &str = "name,property,value,source";

/// One row of `zfs get` or `zpool get`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// The dataset or pool the property belongs to.
    pub name: String,
    pub property: String,
    /// `-` when the property does not apply to this dataset.
    pub value: String,
    pub source: PropertySource,
}

impl Property {
    /// Parses one line of exactly four TAB-separated fields.
    ///
    /// Only TAB is a delimiter, so values and `inherited from <name>` sources
    /// containing spaces are kept intact.
    pub fn from_line(line: &str) -> Option<Property> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 4 {
            return None;
        }
        Some(Property {
            name: fields[0].to_string(),
            property: fields[1].to_string(),
            value: fields[2].to_string(),
            source: PropertySource::parse(fields[3]),
        })
    }
}

/// Where a property value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    Local,
    Default,
    /// Inherited, with the ancestor it came from when the tool reports it.
    Inherited { from: Option<String> },
    Temporary,
    Received,
    /// The literal `none` source (read-only and statistics properties).
    Unset,
    /// The `-` placeholder: the property does not apply.
    NotApplicable,
    Other(String),
}

impl PropertySource {
    pub fn parse(text: &str) -> PropertySource {
        match text {
            "local" => PropertySource::Local,
            "default" => PropertySource::Default,
            "temporary" => PropertySource::Temporary,
            "received" => PropertySource::Received,
            "none" => PropertySource::Unset,
            "-" => PropertySource::NotApplicable,
            "inherited" => PropertySource::Inherited { from: None },
            other => match other.strip_prefix("inherited from ") {
                Some(from) => PropertySource::Inherited {
                    from: Some(from.to_string()),
                },
                None => PropertySource::Other(other.to_string()),
            },
        }
    }

    /// Value for the `-s` filter of `zfs get`.
    pub fn filter_name(&self) -> &str {
        match self {
            PropertySource::Local => "local",
            PropertySource::Default => "default",
            PropertySource::Inherited { .. } => "inherited",
            PropertySource::Temporary => "temporary",
            PropertySource::Received => "received",
            PropertySource::Unset => "none",
            PropertySource::NotApplicable => "-",
            PropertySource::Other(s) => s,
        }
    }
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertySource::Inherited { from: Some(from) } => write!(f, "inherited from {}", from),
            other => f.write_str(other.filter_name()),
        }
    }
}

impl Serialize for PropertySource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

//! Declared monitor configuration.

use std::collections::BTreeMap;
use std::fmt;

/// Backend kind of a declared monitor.
///
/// The set of backends is closed. Any tag that does not name a supported
/// backend is kept verbatim in [`MonitorType::Unrecognized`] so that the
/// reporter factory can reject it with a useful message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum MonitorType {
    /// InfluxDB 2.x, tag `influx`.
    Influx,
    /// Anything else found in configuration.
    Unrecognized(String),
}

impl MonitorType {
    /// The tag used for this type in configuration files.
    pub fn as_str(&self) -> &str {
        match self {
            MonitorType::Influx => "influx",
            MonitorType::Unrecognized(tag) => tag,
        }
    }
}

impl From<&str> for MonitorType {
    fn from(tag: &str) -> Self {
        match tag {
            "influx" => MonitorType::Influx,
            other => MonitorType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for MonitorType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "influx" => MonitorType::Influx,
            _ => MonitorType::Unrecognized(tag),
        }
    }
}

impl From<MonitorType> for String {
    fn from(kind: MonitorType) -> Self {
        match kind {
            MonitorType::Influx => "influx".to_string(),
            MonitorType::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitor as declared in the static configuration.
///
/// ```yaml
/// monitors:
///   grafana:
///     type: influx
///     env:
///       influx_url: http://localhost:8086
///       influx_org: home
///       influx_bucket: backups
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorConfig {
    /// Backend this monitor reports to.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: MonitorType,

    /// Backend settings. Keys are matched case-insensitively.
    #[cfg_attr(feature = "serde", serde(default))]
    pub env: BTreeMap<String, String>,
}

impl MonitorConfig {
    /// Create a monitor of the given type with no declared settings.
    pub fn new(kind: impl Into<MonitorType>) -> Self {
        Self {
            kind: kind.into(),
            env: BTreeMap::new(),
        }
    }

    /// Add a declared setting.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

//! Metric point - one normalized time-series sample.

use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

/// Numeric value of a point field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// The value widened to `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            FieldValue::Integer(v) => v as f64,
            FieldValue::Float(v) => v,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A single measurement: name, string tags, numeric fields and a timestamp.
///
/// Tags and fields are kept in key order so that encodings are stable.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub timestamp: SystemTime,
}

impl MetricPoint {
    /// Create a builder for a point of the given measurement.
    pub fn builder(measurement: impl Into<String>) -> MetricPointBuilder {
        MetricPointBuilder::new(measurement)
    }

    /// Get a tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Get a field value.
    pub fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields.get(key).copied()
    }
}

/// Builder for [`MetricPoint`].
#[derive(Debug)]
pub struct MetricPointBuilder {
    measurement: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
    timestamp: Option<SystemTime>,
}

impl MetricPointBuilder {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Add a tag. A later tag with the same key replaces the earlier one.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Add a field. A later field with the same key replaces the earlier one.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set the timestamp (default: now).
    pub fn timestamp(mut self, ts: SystemTime) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn build(self) -> MetricPoint {
        MetricPoint {
            measurement: self.measurement,
            tags: self.tags,
            fields: self.fields,
            timestamp: self.timestamp.unwrap_or_else(SystemTime::now),
        }
    }
}

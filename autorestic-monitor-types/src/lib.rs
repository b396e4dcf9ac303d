//! # autorestic-monitor-types
//!
//! Core types shared by the autorestic monitoring pipeline. A host process
//! declares monitors ([`MonitorConfig`]), hands each completed backup run
//! over as a [`BackupRunRecord`], and reporters turn the record into a
//! normalized [`MetricPoint`].
//!
//! ## Features
//!
//! - `serde`: (de)serialization of configuration and records via serde
//!
//! ## Example
//!
//! ```rust
//! use autorestic_monitor_types::{FieldValue, MetricPoint};
//! use std::time::UNIX_EPOCH;
//!
//! let point = MetricPoint::builder("autorestic_backup")
//!     .tag("location", "home")
//!     .field("files_added", 12)
//!     .field("duration_seconds", 1.5)
//!     .timestamp(UNIX_EPOCH)
//!     .build();
//!
//! assert_eq!(point.fields["files_added"], FieldValue::Integer(12));
//! ```

mod monitor;
mod point;
mod record;

pub use monitor::*;
pub use point::*;
pub use record::*;

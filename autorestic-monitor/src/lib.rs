//! # autorestic-monitor
//!
//! Reports completed backup runs to an external metrics store.
//!
//! A host declares monitors in its configuration. For each one it asks the
//! factory for a [`Reporter`], which resolves the monitor's settings
//! ([`env`]), validates the backend, and then turns every
//! [`BackupRunRecord`] into a normalized point ([`point`], [`units`]).
//!
//! ## Supported Backends
//!
//! - **InfluxDB 2.x** (`type: influx`) - see [`influx`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autorestic_monitor::{new_reporter, BackupRunRecord, MonitorConfig, Reporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MonitorConfig::new("influx")
//!         .with_env("influx_url", "http://localhost:8086")
//!         .with_env("influx_org", "home")
//!         .with_env("influx_bucket", "backups");
//!
//!     // INFLUX_TOKEN comes from AUTORESTIC_GRAFANA_INFLUX_TOKEN
//!     let mut reporter = new_reporter("grafana", &config).await?;
//!
//!     let record = BackupRunRecord::builder()
//!         .exit_code("0")
//!         .added_size("2.5 MiB")
//!         .processed("1,024", "1.2 GiB", "1:30")
//!         .build();
//!
//!     reporter.report(&record, "documents", "nightly", "s3").await?;
//!     reporter.close();
//!     Ok(())
//! }
//! ```

pub mod env;
pub mod error;
pub mod influx;
pub mod point;
pub mod reporter;
pub mod units;

pub use env::{resolve_env, resolve_env_from, EffectiveEnvironment};
pub use error::MonitorError;
pub use reporter::{new_reporter, Reporter};

// Re-export types for convenience
pub use autorestic_monitor_types::{
    BackupRunRecord, ChangeCounts, FieldValue, MetricPoint, MonitorConfig, MonitorType,
    ProcessedStats,
};

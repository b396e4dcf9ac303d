//! # autorestic-report
//!
//! Host side of autorestic monitoring: loads the monitors declared in an
//! autorestic configuration file, reads the record of a finished backup run
//! and reports it through every monitor.
//!
//! ```text
//! .autorestic.yml ──▶ config::load_monitors ──┐
//!                                             ├──▶ run::report_all ──▶ InfluxDB
//! record.json ─────▶ record::read_record ─────┘
//! ```
//!
//! A monitor that cannot be built (incomplete settings, backend down,
//! missing bucket) is disabled for the run and logged; it never aborts the
//! other monitors.
//!
//! ## Usage
//!
//! ```bash
//! AUTORESTIC_GRAFANA_INFLUX_TOKEN=... autorestic-report \
//!     --config .autorestic.yml --record run.json \
//!     --location documents --backend s3 --tag nightly
//! ```

pub mod config;
pub mod record;
pub mod run;

pub use config::load_monitors;
pub use record::read_record;
pub use run::{report_all, ReportTarget, RunSummary};

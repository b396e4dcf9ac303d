//! Conversion of a backup-run record into a metric point.

use std::time::SystemTime;

use autorestic_monitor_types::{BackupRunRecord, MetricPoint};

use crate::units::{parse_bytes, parse_duration, parse_int};

/// Measurement name of every backup point.
pub const MEASUREMENT: &str = "autorestic_backup";

/// Build the point describing one backup run.
///
/// Tags are copied verbatim; every numeric field goes through the unit
/// parsers, so a malformed value becomes zero without affecting the others.
pub fn backup_point(
    record: &BackupRunRecord,
    location: &str,
    tag: &str,
    backend: &str,
    timestamp: SystemTime,
) -> MetricPoint {
    MetricPoint::builder(MEASUREMENT)
        .tag("location", location)
        .tag("backend", backend)
        .tag("exit_code", record.exit_code.as_str())
        .tag("snapshot_id", record.snapshot_id.as_str())
        .tag("tag", tag)
        .field("files_added", parse_int(&record.files.added))
        .field("files_changed", parse_int(&record.files.changed))
        .field("files_unmodified", parse_int(&record.files.unmodified))
        .field("dirs_added", parse_int(&record.dirs.added))
        .field("dirs_changed", parse_int(&record.dirs.changed))
        .field("dirs_unmodified", parse_int(&record.dirs.unmodified))
        .field("added_size_bytes", parse_bytes(&record.added_size))
        .field("processed_files", parse_int(&record.processed.files))
        .field("processed_size_bytes", parse_bytes(&record.processed.size))
        .field("duration_seconds", parse_duration(&record.processed.duration))
        .timestamp(timestamp)
        .build()
}

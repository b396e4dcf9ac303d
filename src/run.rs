//! Reporting one backup run through a set of monitors.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use tracing::{error, info, warn};

use autorestic_monitor::{new_reporter, BackupRunRecord, MonitorConfig, Reporter};

/// Where the reported backup ran.
#[derive(Debug, Clone, Default)]
pub struct ReportTarget {
    pub location: String,
    pub backend: String,
    pub tag: String,
}

/// Outcome per monitor, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Monitors that accepted the point.
    pub reported: Vec<String>,
    /// Monitors that could not be built and were skipped.
    pub disabled: Vec<String>,
    /// Monitors whose write failed.
    pub failed: Vec<String>,
}

impl RunSummary {
    /// True when no write failed. Disabled monitors do not count.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Report `record` through the monitors named in `selection`, or through all
/// of them when `selection` is empty.
///
/// Naming a monitor that is not declared is an error and nothing is
/// reported. Every reporter that was built is closed before returning.
pub async fn report_all(
    monitors: &BTreeMap<String, MonitorConfig>,
    selection: &[String],
    record: &BackupRunRecord,
    target: &ReportTarget,
) -> Result<RunSummary> {
    if let Some(unknown) = selection.iter().find(|name| !monitors.contains_key(*name)) {
        bail!("monitor '{}' is not declared", unknown);
    }

    let selected = monitors
        .iter()
        .filter(|(name, _)| selection.is_empty() || selection.contains(*name));

    let mut summary = RunSummary::default();
    let mut reporters: Vec<(&str, Box<dyn Reporter>)> = Vec::new();

    for (name, config) in selected {
        match new_reporter(name, config).await {
            Ok(reporter) => reporters.push((name.as_str(), reporter)),
            Err(e) => {
                warn!("monitor {} disabled for this run: {}", name, e);
                summary.disabled.push(name.clone());
            }
        }
    }

    for (name, reporter) in &reporters {
        match reporter
            .report(record, &target.location, &target.tag, &target.backend)
            .await
        {
            Ok(()) => {
                info!("reported {} to monitor {}", target.location, name);
                summary.reported.push(name.to_string());
            }
            Err(e) => {
                error!("monitor {} failed to report {}: {}", name, target.location, e);
                summary.failed.push(name.to_string());
            }
        }
    }

    for (_, reporter) in &mut reporters {
        reporter.close();
    }

    Ok(summary)
}

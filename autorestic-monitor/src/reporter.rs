//! The reporter contract and the factory that picks a backend.

use async_trait::async_trait;
use tracing::debug;

use autorestic_monitor_types::{BackupRunRecord, MonitorConfig, MonitorType};

use crate::env::resolve_env;
use crate::influx::InfluxReporter;
use crate::MonitorError;

/// A live connection to a metrics backend.
///
/// `report` takes `&self` and may be called from several tasks at once.
/// `close` takes `&mut self`, so it cannot overlap a report in flight.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Write one point describing `record` and wait for the backend to
    /// acknowledge it. Failures are returned as-is; nothing is retried.
    async fn report(
        &self,
        record: &BackupRunRecord,
        location: &str,
        tag: &str,
        backend: &str,
    ) -> Result<(), MonitorError>;

    /// Release the backend connection. Calling it again does nothing.
    fn close(&mut self);
}

/// Build the reporter for the monitor declared as `name`.
///
/// The effective environment is resolved fresh on every call. Backend
/// constructors validate their settings and connectivity here, so an `Ok`
/// reporter is ready to use.
pub async fn new_reporter(
    name: &str,
    config: &MonitorConfig,
) -> Result<Box<dyn Reporter>, MonitorError> {
    let env = resolve_env(name, config);
    debug!("building {} reporter for monitor {:?}", config.kind, name);

    match &config.kind {
        MonitorType::Influx => {
            let reporter = InfluxReporter::from_env(&env).connect().await?;
            Ok(Box::new(reporter))
        }
        MonitorType::Unrecognized(tag) => Err(MonitorError::UnknownType(tag.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_type_is_rejected_by_name() {
        let _env = crate::env::TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = MonitorConfig::new("prometheus").with_env("url", "http://localhost:9090");

        let err = new_reporter("reporter-rs-unknown", &config).await.err().unwrap();
        assert!(matches!(err, MonitorError::UnknownType(ref t) if t == "prometheus"));
        assert_eq!(err.to_string(), "unknown monitor type: 'prometheus'");
    }

    #[tokio::test]
    async fn influx_without_settings_fails_fast() {
        let _env = crate::env::TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = MonitorConfig::new("influx").with_env("influx_url", "http://127.0.0.1:9");

        let err = new_reporter("reporter-rs-incomplete", &config)
            .await
            .err()
            .unwrap();

        match err {
            MonitorError::IncompleteConfig { missing, .. } => {
                assert_eq!(missing, vec!["INFLUX_TOKEN", "INFLUX_ORG", "INFLUX_BUCKET"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

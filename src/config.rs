//! Loading monitor declarations from an autorestic configuration file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;

use autorestic_monitor::MonitorConfig;

/// The parts of an autorestic configuration this crate cares about.
#[derive(Debug, Default, Deserialize)]
struct HostConfig {
    #[serde(default)]
    monitors: BTreeMap<String, MonitorConfig>,
}

/// Load the `monitors` section of the configuration at `path`.
///
/// The format follows the file extension (`.yml`, `.yaml`, `.toml`, `.json`).
/// A file without a `monitors` section declares no monitors.
pub fn load_monitors(path: &Path) -> Result<BTreeMap<String, MonitorConfig>> {
    let config = Config::builder()
        .add_source(File::from(path))
        .build()
        .with_context(|| format!("Failed to load config {}", path.display()))?;

    let host: HostConfig = config
        .try_deserialize()
        .with_context(|| format!("Invalid monitors section in {}", path.display()))?;

    Ok(host.monitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autorestic_monitor::MonitorType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_declared_monitors() {
        let file = yaml_file(
            r#"
version: 2
locations:
  home:
    from: /home
    to: [s3]
monitors:
  grafana:
    type: influx
    env:
      influx_url: http://localhost:8086
      influx_org: home
  legacy:
    type: graphite
"#,
        );

        let monitors = load_monitors(file.path()).unwrap();
        assert_eq!(monitors.len(), 2);

        let grafana = &monitors["grafana"];
        assert_eq!(grafana.kind, MonitorType::Influx);
        assert_eq!(grafana.env.len(), 2);
        assert!(grafana.env.values().any(|v| v == "http://localhost:8086"));

        let legacy = &monitors["legacy"];
        assert_eq!(legacy.kind, MonitorType::Unrecognized("graphite".to_string()));
        assert!(legacy.env.is_empty());
    }

    #[test]
    fn missing_section_means_no_monitors() {
        let file = yaml_file("version: 2\nlocations: {}\n");
        let monitors = load_monitors(file.path()).unwrap();
        assert!(monitors.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_monitors(Path::new("/nonexistent/.autorestic.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn monitor_without_type_is_an_error() {
        let file = yaml_file("monitors:\n  broken:\n    env:\n      a: b\n");
        assert!(load_monitors(file.path()).is_err());
    }
}

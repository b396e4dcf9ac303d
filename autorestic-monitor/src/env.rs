//! Effective environment of a monitor.
//!
//! Declared `env` entries are seeded first, then process variables named
//! `AUTORESTIC_<MONITOR>_<KEY>` overwrite them. Keys are upper-cased.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use autorestic_monitor_types::MonitorConfig;

/// Namespace token every monitor override variable starts with.
pub const ENV_NAMESPACE: &str = "AUTORESTIC";

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9]+").expect("sanitize pattern is valid"));

/// Held by tests that read or write the process environment.
#[cfg(test)]
pub(crate) static TEST_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Resolved settings for one monitor, keyed by upper-case name.
pub type EffectiveEnvironment = BTreeMap<String, String>;

/// Variable-name prefix for overrides of the monitor called `name`.
///
/// `"my monitor"` becomes `AUTORESTIC_MY_MONITOR_`.
pub fn env_prefix(name: &str) -> String {
    let upper = name.to_uppercase();
    let sanitized = NON_ALNUM_RE.replace_all(&upper, "_");
    format!("{}_{}_", ENV_NAMESPACE, sanitized)
}

/// Resolve the effective environment against the current process environment.
pub fn resolve_env(name: &str, config: &MonitorConfig) -> EffectiveEnvironment {
    let vars = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    resolve_env_from(name, config, vars)
}

/// Resolve the effective environment against an explicit set of variables.
pub fn resolve_env_from<I>(name: &str, config: &MonitorConfig, vars: I) -> EffectiveEnvironment
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut env: EffectiveEnvironment = config
        .env
        .iter()
        .map(|(key, value)| (key.to_uppercase(), value.clone()))
        .collect();

    let prefix = env_prefix(name);
    for (key, value) in vars {
        if let Some(stripped) = key.strip_prefix(&prefix) {
            env.insert(stripped.to_string(), value);
        }
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn prefix_simple_name() {
        assert_eq!(env_prefix("grafana"), "AUTORESTIC_GRAFANA_");
    }

    #[test]
    fn prefix_collapses_runs_of_punctuation() {
        assert_eq!(env_prefix("my monitor"), "AUTORESTIC_MY_MONITOR_");
        assert_eq!(env_prefix("my -- monitor"), "AUTORESTIC_MY_MONITOR_");
        assert_eq!(env_prefix("influx.prod/eu-1"), "AUTORESTIC_INFLUX_PROD_EU_1_");
        assert_eq!(env_prefix("  edge  "), "AUTORESTIC__EDGE__");
    }

    #[test]
    fn declared_keys_are_upper_cased() {
        let config = MonitorConfig::new("influx")
            .with_env("influx_url", "http://db:8086")
            .with_env("Influx_Org", "home");

        let env = resolve_env_from("grafana", &config, Vec::new());
        assert_eq!(env.get("INFLUX_URL").map(String::as_str), Some("http://db:8086"));
        assert_eq!(env.get("INFLUX_ORG").map(String::as_str), Some("home"));
        assert!(!env.contains_key("influx_url"));
    }

    #[test]
    fn process_variables_override_declared_values() {
        let config = MonitorConfig::new("influx")
            .with_env("influx_token", "checked-in")
            .with_env("influx_org", "home");

        let env = resolve_env_from(
            "my monitor",
            &config,
            vars(&[
                ("AUTORESTIC_MY_MONITOR_INFLUX_TOKEN", "secret"),
                ("AUTORESTIC_MY_MONITOR_INFLUX_BUCKET", "backups"),
            ]),
        );

        assert_eq!(env["INFLUX_TOKEN"], "secret");
        assert_eq!(env["INFLUX_ORG"], "home");
        assert_eq!(env["INFLUX_BUCKET"], "backups");
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let config = MonitorConfig::new("influx");
        let env = resolve_env_from(
            "grafana",
            &config,
            vars(&[
                ("PATH", "/usr/bin"),
                ("AUTORESTIC_OTHER_INFLUX_URL", "http://other"),
                ("AUTORESTIC_GRAFANAX_INFLUX_URL", "http://other"),
                ("autorestic_grafana_INFLUX_URL", "http://lower"),
            ]),
        );

        assert!(env.is_empty());
    }

    #[test]
    fn override_keys_are_taken_verbatim() {
        let config = MonitorConfig::new("influx");
        let env = resolve_env_from(
            "grafana",
            &config,
            vars(&[("AUTORESTIC_GRAFANA_influx_url", "http://x")]),
        );

        assert_eq!(env.get("influx_url").map(String::as_str), Some("http://x"));
    }

    #[test]
    fn reads_process_environment() {
        let _env = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("AUTORESTIC_ENV_RS_TEST_MONITOR_INFLUX_ORG", "from-process");
        let config = MonitorConfig::new("influx").with_env("influx_org", "declared");

        let env = resolve_env("env.rs test monitor", &config);
        assert_eq!(env["INFLUX_ORG"], "from-process");

        std::env::remove_var("AUTORESTIC_ENV_RS_TEST_MONITOR_INFLUX_ORG");
    }
}

//! InfluxDB 2.x reporter using the HTTP API.
//!
//! Settings are read from the monitor's effective environment:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `INFLUX_URL` | Server URL, e.g. `http://localhost:8086` |
//! | `INFLUX_TOKEN` | API token |
//! | `INFLUX_ORG` | Organization name |
//! | `INFLUX_BUCKET` | Target bucket |
//!
//! Construction checks `/health` and looks the bucket up before handing out a
//! reporter. Each report is one blocking write of one point.
//!
//! ## Example
//!
//! ```rust,no_run
//! use autorestic_monitor::influx::InfluxReporter;
//! use autorestic_monitor::{BackupRunRecord, Reporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut reporter = InfluxReporter::builder()
//!         .url("http://localhost:8086")
//!         .token("my-token")
//!         .org("home")
//!         .bucket("backups")
//!         .connect()
//!         .await?;
//!
//!     let record = BackupRunRecord::builder().exit_code("0").build();
//!     reporter.report(&record, "documents", "nightly", "s3").await?;
//!     reporter.close();
//!     Ok(())
//! }
//! ```

pub mod line_protocol;

use std::fmt;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use autorestic_monitor_types::{BackupRunRecord, MetricPoint};

use crate::env::EffectiveEnvironment;
use crate::point::backup_point;
use crate::{MonitorError, Reporter};

pub const URL_KEY: &str = "INFLUX_URL";
pub const TOKEN_KEY: &str = "INFLUX_TOKEN";
pub const ORG_KEY: &str = "INFLUX_ORG";
pub const BUCKET_KEY: &str = "INFLUX_BUCKET";

/// Upper bound for the health and bucket checks done while connecting.
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Reporter writing backup points to an InfluxDB bucket.
pub struct InfluxReporter {
    client: Option<Client>,
    url: String,
    token: String,
    org: String,
    bucket: String,
}

impl InfluxReporter {
    /// Create a new builder for configuring the reporter.
    pub fn builder() -> InfluxReporterBuilder {
        InfluxReporterBuilder::default()
    }

    /// Create a builder from a monitor's effective environment.
    pub fn from_env(env: &EffectiveEnvironment) -> InfluxReporterBuilder {
        InfluxReporterBuilder {
            url: env.get(URL_KEY).cloned(),
            token: env.get(TOKEN_KEY).cloned(),
            org: env.get(ORG_KEY).cloned(),
            bucket: env.get(BUCKET_KEY).cloned(),
            validation_timeout: None,
        }
    }

    /// Organization points are written to.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Bucket points are written to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Whether [`Reporter::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    /// Write a single point and wait for the server to acknowledge it.
    pub async fn write_point(&self, point: &MetricPoint) -> Result<(), MonitorError> {
        let body = line_protocol::encode(point);

        let response = self
            .request(reqwest::Method::POST, "/api/v2/write")?
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("wrote {} point to bucket {}", point.measurement, self.bucket);
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&text)
            .map(|e| e.message)
            .unwrap_or(text);

        if status == StatusCode::UNAUTHORIZED {
            return Err(MonitorError::Auth(message));
        }

        Err(MonitorError::Write {
            status: status.as_u16(),
            message,
        })
    }

    async fn validate(&self) -> Result<(), MonitorError> {
        self.check_health().await?;
        self.find_bucket().await
    }

    async fn check_health(&self) -> Result<(), MonitorError> {
        let response = self
            .request(reqwest::Method::GET, "/health")?
            .send()
            .await
            .map_err(|e| match MonitorError::from(e) {
                MonitorError::Http(msg) => MonitorError::Connection(msg),
                other => other,
            })?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<HealthCheck>(&body) {
            Ok(health) if status.is_success() && health.status == "pass" => Ok(()),
            Ok(health) => Err(MonitorError::Connection(format!(
                "InfluxDB reports status '{}': {}",
                health.status,
                health.message.unwrap_or_default()
            ))),
            Err(_) if !status.is_success() => Err(MonitorError::Connection(format!(
                "health check returned status {}",
                status
            ))),
            Err(e) => Err(MonitorError::Parse(e.to_string())),
        }
    }

    async fn find_bucket(&self) -> Result<(), MonitorError> {
        let response = self
            .request(reqwest::Method::GET, "/api/v2/buckets")?
            .query(&[("name", self.bucket.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(MonitorError::Auth("Invalid token".to_string()));
        }

        if !response.status().is_success() {
            return Err(MonitorError::Bucket {
                bucket: self.bucket.clone(),
                reason: format!("API returned status {}", response.status()),
            });
        }

        let list: BucketList = response
            .json()
            .await
            .map_err(|e| MonitorError::Parse(e.to_string()))?;

        if list.buckets.iter().any(|b| b.name == self.bucket) {
            Ok(())
        } else {
            Err(MonitorError::Bucket {
                bucket: self.bucket.clone(),
                reason: "not found".to_string(),
            })
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, MonitorError> {
        let client = self.client.as_ref().ok_or(MonitorError::Closed)?;
        Ok(client
            .request(method, format!("{}{}", self.url, path))
            .header(AUTHORIZATION, format!("Token {}", self.token)))
    }
}

#[async_trait]
impl Reporter for InfluxReporter {
    async fn report(
        &self,
        record: &BackupRunRecord,
        location: &str,
        tag: &str,
        backend: &str,
    ) -> Result<(), MonitorError> {
        let point = backup_point(record, location, tag, backend, SystemTime::now());
        self.write_point(&point).await
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("closed InfluxDB client for bucket {}", self.bucket);
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for InfluxReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxReporter")
            .field("url", &self.url)
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Builder for InfluxReporter.
#[derive(Default)]
pub struct InfluxReporterBuilder {
    url: Option<String>,
    token: Option<String>,
    org: Option<String>,
    bucket: Option<String>,
    validation_timeout: Option<Duration>,
}

impl InfluxReporterBuilder {
    /// Set the server URL (e.g., "http://localhost:8086").
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the organization.
    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Set the bucket.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the time allowed for the connection checks (default: 2 seconds).
    pub fn validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = Some(timeout);
        self
    }

    /// Names of required settings that are missing or empty.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            (URL_KEY, &self.url),
            (TOKEN_KEY, &self.token),
            (ORG_KEY, &self.org),
            (BUCKET_KEY, &self.bucket),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(key, _)| key)
        .collect()
    }

    /// Open a client, check the server and bucket, and build the reporter.
    ///
    /// Fails without touching the network when a setting is missing.
    pub async fn connect(self) -> Result<InfluxReporter, MonitorError> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(MonitorError::IncompleteConfig {
                backend: "influx",
                missing,
            });
        }

        let timeout = self.validation_timeout.unwrap_or(DEFAULT_VALIDATION_TIMEOUT);
        let client = Client::builder().build()?;

        let reporter = InfluxReporter {
            client: Some(client),
            url: self
                .url
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            token: self.token.unwrap_or_default(),
            org: self.org.unwrap_or_default(),
            bucket: self.bucket.unwrap_or_default(),
        };

        match tokio::time::timeout(timeout, reporter.validate()).await {
            Ok(Ok(())) => {
                info!(
                    "connected to InfluxDB at {} (org {}, bucket {})",
                    reporter.url, reporter.org, reporter.bucket
                );
                Ok(reporter)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(MonitorError::Timeout),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Deserialize)]
struct HealthCheck {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Response of `GET /api/v2/buckets`.
#[derive(Debug, Deserialize)]
struct BucketList {
    #[serde(default)]
    buckets: Vec<BucketInfo>,
}

#[derive(Debug, Deserialize)]
struct BucketInfo {
    name: String,
}

/// Error body returned by the v2 API.
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

//! Environment-driven application configuration.

use std::time::Duration;

use crate::domain::{InvalidStopId, StopId};
use crate::poll::PollConfig;
use crate::source::StopRequest;

/// Default poll interval in seconds.
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;

/// Default consecutive-failure threshold before no-data.
const DEFAULT_FAILURE_THRESHOLD: u32 = 2;

/// Default `MaximumStopVisits` requested per stop.
const DEFAULT_MAX_STOP_VISITS: u32 = 5;

/// Default bind address for the read surface.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration errors, surfaced to the operator at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A numeric variable did not parse
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    /// A STOPS entry had an invalid stop id
    #[error("invalid stop entry {entry:?}: {source}")]
    InvalidStop {
        entry: String,
        source: InvalidStopId,
    },

    /// No stops configured
    #[error("STOPS must list at least one stop id")]
    NoStops,
}

/// Process-wide configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// URL of the NeTEx topology document.
    pub netex_url: String,

    /// SIRI StopMonitoring endpoint URL.
    pub siri_endpoint: String,

    /// Dataset/access identifier for the SIRI endpoint.
    pub dataset_id: String,

    /// Seconds between polls of one stop. Rejected at parse time when zero.
    pub scan_interval_secs: u64,

    /// Consecutive failures tolerated before no-data.
    pub failure_threshold: u32,

    /// `MaximumStopVisits` requested per stop.
    pub max_stop_visits: u32,

    /// Listen address for the web read surface.
    pub bind_addr: String,

    /// Stops to monitor.
    pub stops: Vec<StopRequest>,
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// Required: `NETEX_URL`, `SIRI_ENDPOINT`, `DATASET_ID`, `STOPS`.
    /// `STOPS` is a comma-separated list of `id` or `id=Display Name`
    /// entries.
    pub fn from_env() -> Result<Self, ConfigError> {
        let netex_url = require("NETEX_URL")?;
        let siri_endpoint = require("SIRI_ENDPOINT")?;
        let dataset_id = require("DATASET_ID")?;
        let stops = parse_stop_list(&require("STOPS")?)?;

        let scan_interval_secs =
            optional_parsed("SCAN_INTERVAL_SECS", DEFAULT_SCAN_INTERVAL_SECS)?;
        if scan_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SCAN_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            netex_url,
            siri_endpoint,
            dataset_id,
            scan_interval_secs,
            failure_threshold: optional_parsed("FAILURE_THRESHOLD", DEFAULT_FAILURE_THRESHOLD)?,
            max_stop_visits: optional_parsed("MAX_STOP_VISITS", DEFAULT_MAX_STOP_VISITS)?,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            stops,
        })
    }

    /// Poll scheduler tuning derived from this configuration.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.scan_interval_secs),
            failure_threshold: self.failure_threshold,
        }
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional_parsed<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: v,
        }),
        Err(_) => Ok(default),
    }
}

/// Parse the `STOPS` list: comma-separated `id` or `id=Display Name`.
pub fn parse_stop_list(raw: &str) -> Result<Vec<StopRequest>, ConfigError> {
    let mut stops = Vec::new();

    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let (id_part, name_part) = match entry.split_once('=') {
            Some((id, name)) => (id, Some(name.trim())),
            None => (entry, None),
        };

        let id = StopId::parse(id_part).map_err(|source| ConfigError::InvalidStop {
            entry: entry.to_string(),
            source,
        })?;

        stops.push(StopRequest {
            id,
            display_name: name_part.filter(|n| !n.is_empty()).map(String::from),
        });
    }

    if stops.is_empty() {
        return Err(ConfigError::NoStops);
    }

    Ok(stops)
}

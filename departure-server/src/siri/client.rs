//! SIRI StopMonitoring HTTP client.
//!
//! POSTs one StopMonitoringRequest envelope per fetch and parses the
//! delivery. A semaphore caps concurrent requests across all polling
//! tasks so a large stop count cannot stampede the provider.

use std::sync::Arc;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{RawDeparture, StopId};

use super::DepartureFeed;
use super::error::SiriError;
use super::parse::parse_stop_monitoring;
use super::request::build_stop_monitoring_request;

/// Default `RequestorRef` sent in the envelope.
const DEFAULT_REQUESTOR_REF: &str = "departure-server";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default `MaximumStopVisits` per request.
const DEFAULT_MAX_STOP_VISITS: u32 = 5;

/// Configuration for the SIRI client.
#[derive(Debug, Clone)]
pub struct SiriConfig {
    /// StopMonitoring endpoint URL
    pub endpoint: String,
    /// Dataset/access identifier, sent as the `datasetId` header
    pub dataset_id: String,
    /// Requestor identifier placed in the envelope
    pub requestor_ref: String,
    /// Upper bound on visits requested per stop
    pub max_stop_visits: u32,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SiriConfig {
    /// Create a new config for the given endpoint and dataset.
    pub fn new(endpoint: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            dataset_id: dataset_id.into(),
            requestor_ref: DEFAULT_REQUESTOR_REF.to_string(),
            max_stop_visits: DEFAULT_MAX_STOP_VISITS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set the requestor reference.
    pub fn with_requestor_ref(mut self, requestor: impl Into<String>) -> Self {
        self.requestor_ref = requestor.into();
        self
    }

    /// Set the per-request visit cap.
    pub fn with_max_stop_visits(mut self, n: u32) -> Self {
        self.max_stop_visits = n;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// SIRI StopMonitoring API client.
#[derive(Debug, Clone)]
pub struct SiriClient {
    http: reqwest::Client,
    endpoint: String,
    requestor_ref: String,
    max_stop_visits: u32,
    semaphore: Arc<Semaphore>,
}

impl SiriClient {
    /// Create a new SIRI client with the given configuration.
    pub fn new(config: SiriConfig) -> Result<Self, SiriError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/xml"),
        );

        let dataset_id =
            HeaderValue::from_str(&config.dataset_id).map_err(|_| SiriError::Api {
                status: 0,
                message: "dataset id is not a valid header value".to_string(),
            })?;
        headers.insert(HeaderName::from_static("datasetid"), dataset_id);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            requestor_ref: config.requestor_ref,
            max_stop_visits: config.max_stop_visits,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch and parse the upcoming visits for one stop.
    pub async fn fetch(&self, stop: &StopId) -> Result<Vec<RawDeparture>, SiriError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SiriError::Api {
                status: 0,
                message: "semaphore closed".to_string(),
            })?;

        let envelope = build_stop_monitoring_request(
            stop.as_str(),
            &self.requestor_ref,
            self.max_stop_visits,
            Utc::now(),
        );

        debug!(stop = %stop, "requesting stop monitoring");

        let response = self
            .http
            .post(&self.endpoint)
            .body(envelope)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SiriError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        let departures = parse_stop_monitoring(&body)?;

        debug!(stop = %stop, visits = departures.len(), "stop monitoring parsed");

        Ok(departures)
    }
}

impl DepartureFeed for SiriClient {
    async fn fetch_departures(&self, stop: &StopId) -> Result<Vec<RawDeparture>, SiriError> {
        self.fetch(stop).await
    }
}

//! Data transfer objects for the read surface.

use serde::{Deserialize, Serialize};

use crate::domain::Departure;
use crate::poll::{SensorState, SensorStatus};

/// Query parameters for stop search.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    /// Search term, matched against normalized stop names
    pub q: String,

    /// Maximum number of results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// One stop search match.
#[derive(Debug, Serialize)]
pub struct StopSearchResult {
    pub id: String,
    pub name: String,
}

/// Stop search response.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<StopSearchResult>,
}

/// A departure in a sensor snapshot.
#[derive(Debug, Serialize)]
pub struct DepartureDto {
    pub line: String,
    pub destination: String,

    /// Scheduled departure time, RFC 3339.
    pub aimed: String,

    /// Predicted departure time, RFC 3339.
    pub expected: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_at_stop: Option<bool>,
}

/// A stop's sensor snapshot.
#[derive(Debug, Serialize)]
pub struct SensorStateDto {
    pub stop_id: String,
    pub stop_name: String,
    pub status: &'static str,

    /// RFC 3339 time of the last successful refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,

    pub departures: Vec<DepartureDto>,
}

impl From<&Departure> for DepartureDto {
    fn from(d: &Departure) -> Self {
        Self {
            line: d.line.clone(),
            destination: d.destination.clone(),
            aimed: d.aimed.to_rfc3339(),
            expected: d.expected.to_rfc3339(),
            vehicle_at_stop: d.vehicle_at_stop,
        }
    }
}

impl From<&SensorState> for SensorStateDto {
    fn from(state: &SensorState) -> Self {
        Self {
            stop_id: state.stop_id.to_string(),
            stop_name: state.stop_name.clone(),
            status: status_label(state.status),
            last_update: state.last_update.map(|t| t.to_rfc3339()),
            departures: state.departures.iter().map(DepartureDto::from).collect(),
        }
    }
}

fn status_label(status: SensorStatus) -> &'static str {
    match status {
        SensorStatus::Ok => "ok",
        SensorStatus::Stale => "stale",
        SensorStatus::NoData => "no_data",
        SensorStatus::Error => "error",
    }
}

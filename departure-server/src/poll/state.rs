//! Sensor state and the stale-on-failure state machine.

use chrono::{DateTime, Utc};

use crate::domain::{Departure, StopId};

/// Health of one monitored stop's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    /// Last poll succeeded; departures are current.
    Ok,
    /// Recent polls failed but the failure streak is below the threshold;
    /// departures are the last successful snapshot.
    Stale,
    /// The failure streak reached the threshold; departures were cleared
    /// rather than shown arbitrarily old.
    NoData,
    /// Polling has never succeeded for this stop.
    Error,
}

/// Snapshot of one monitored stop, as read by downstream consumers.
///
/// Fully replaced on every successful poll; never merged. Mutated only by
/// the owning stop's polling task, so consumers always see a consistent
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorState {
    /// Authoritative stop id from configuration.
    pub stop_id: StopId,

    /// Display name (configured name, registry name, or the id itself).
    pub stop_name: String,

    /// When the departures were last successfully refreshed. Not advanced
    /// by failed polls.
    pub last_update: Option<DateTime<Utc>>,

    /// Upcoming departures, sorted ascending by expected time.
    pub departures: Vec<Departure>,

    /// Data health for this stop.
    pub status: SensorStatus,
}

impl SensorState {
    /// State before the first poll: nothing known yet.
    pub fn initial(stop_id: StopId, stop_name: String) -> Self {
        Self {
            stop_id,
            stop_name,
            last_update: None,
            departures: Vec::new(),
            status: SensorStatus::NoData,
        }
    }
}

/// Per-stop poll bookkeeping: the published state plus the failure streak.
///
/// Transition rules:
/// - any success: replace departures, advance `last_update`, status `Ok`,
///   streak reset;
/// - failure before any success: status `Error` (there is no previous data
///   to keep);
/// - failure with streak below the threshold: keep previous departures,
///   status `Stale`, `last_update` untouched;
/// - failure once the streak reaches the threshold: clear departures,
///   status `NoData`, until the next success.
#[derive(Debug, Clone)]
pub struct StopMonitor {
    state: SensorState,
    failures: u32,
}

impl StopMonitor {
    /// Create a monitor in the initial (never-polled) state.
    pub fn new(stop_id: StopId, stop_name: String) -> Self {
        Self {
            state: SensorState::initial(stop_id, stop_name),
            failures: 0,
        }
    }

    /// The current published snapshot.
    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// The stop this monitor belongs to.
    pub fn stop_id(&self) -> &StopId {
        &self.state.stop_id
    }

    /// Current consecutive-failure streak.
    pub fn failure_streak(&self) -> u32 {
        self.failures
    }

    /// Record a successful poll: full snapshot replacement.
    pub fn record_success(&mut self, departures: Vec<Departure>, now: DateTime<Utc>) {
        self.state.departures = departures;
        self.state.last_update = Some(now);
        self.state.status = SensorStatus::Ok;
        self.failures = 0;
    }

    /// Record a failed poll, degrading per the threshold.
    pub fn record_failure(&mut self, threshold: u32) {
        self.failures = self.failures.saturating_add(1);

        if self.state.last_update.is_none() {
            self.state.status = SensorStatus::Error;
            self.state.departures.clear();
        } else if self.failures >= threshold {
            self.state.status = SensorStatus::NoData;
            self.state.departures.clear();
        } else {
            self.state.status = SensorStatus::Stale;
        }
    }
}

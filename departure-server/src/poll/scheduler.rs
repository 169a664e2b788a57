//! Per-stop poll scheduler.
//!
//! One tokio task per monitored stop. Each task sleeps a deterministic
//! stagger offset (so many stops never burst simultaneously), then ticks on
//! a fixed interval with `MissedTickBehavior::Skip`: a tick that comes due
//! while a fetch is still in flight is dropped, which serializes polls per
//! stop. Snapshots are published through a watch channel; consumers clone
//! the latest value and never see a partially-updated state.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::domain::{StopId, normalize_departures};
use crate::siri::DepartureFeed;

use super::state::{SensorState, StopMonitor};

/// Scheduler tuning.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between polls of a single stop.
    pub interval: Duration,

    /// Consecutive failures tolerated before a stop's stale departures are
    /// cleared to no-data.
    pub failure_threshold: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            failure_threshold: 2,
        }
    }
}

/// One stop to poll, with its resolved display name.
#[derive(Debug, Clone)]
pub struct MonitoredStop {
    pub id: StopId,
    pub name: String,
}

/// Runs one polling task per monitored stop and exposes their latest
/// snapshots.
pub struct PollScheduler {
    receivers: HashMap<StopId, watch::Receiver<SensorState>>,
    tasks: Vec<JoinHandle<()>>,
}

impl PollScheduler {
    /// Spawn one polling task per stop.
    ///
    /// Call only after the registry is loaded: the stops passed here must
    /// already be resolved. Tasks run until [`shutdown`](Self::shutdown).
    pub fn start<F: DepartureFeed>(
        feed: Arc<F>,
        stops: Vec<MonitoredStop>,
        config: PollConfig,
    ) -> Self {
        let mut receivers = HashMap::with_capacity(stops.len());
        let mut tasks = Vec::with_capacity(stops.len());

        for stop in stops {
            let initial = SensorState::initial(stop.id.clone(), stop.name.clone());
            let (tx, rx) = watch::channel(initial);
            receivers.insert(stop.id.clone(), rx);

            let feed = feed.clone();
            let config = config.clone();
            tasks.push(tokio::spawn(poll_loop(feed, stop, config, tx)));
        }

        Self { receivers, tasks }
    }

    /// Latest snapshot for a stop, or `None` if the stop is not monitored.
    pub fn get_state(&self, stop_id: &StopId) -> Option<SensorState> {
        self.receivers.get(stop_id).map(|rx| rx.borrow().clone())
    }

    /// Subscribe to a stop's snapshot stream.
    pub fn subscribe(&self, stop_id: &StopId) -> Option<watch::Receiver<SensorState>> {
        self.receivers.get(stop_id).cloned()
    }

    /// Ids of all monitored stops.
    pub fn monitored_stops(&self) -> Vec<StopId> {
        self.receivers.keys().cloned().collect()
    }

    /// Cancel all polling tasks and wait for them to wind down.
    pub async fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        futures::future::join_all(self.tasks).await;
    }
}

/// Poll one stop forever, publishing each new snapshot.
async fn poll_loop<F: DepartureFeed>(
    feed: Arc<F>,
    stop: MonitoredStop,
    config: PollConfig,
    tx: watch::Sender<SensorState>,
) {
    let offset = stagger_offset(&stop.id, config.interval);
    debug!(stop = %stop.id, offset_ms = offset.as_millis() as u64, "staggering first poll");
    tokio::time::sleep(offset).await;

    // tokio::time::interval panics on a zero period.
    let period = config.interval.max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut monitor = StopMonitor::new(stop.id, stop.name);

    loop {
        interval.tick().await;
        poll_once(feed.as_ref(), &mut monitor, config.failure_threshold).await;

        if tx.send(monitor.state().clone()).is_err() {
            // All consumers are gone; nothing left to publish for.
            break;
        }
    }
}

/// One fetch-and-update cycle for a stop.
///
/// Split out of the loop so the state machine can be driven directly in
/// tests without timers.
pub async fn poll_once<F: DepartureFeed>(feed: &F, monitor: &mut StopMonitor, threshold: u32) {
    match feed.fetch_departures(monitor.stop_id()).await {
        Ok(raw) => {
            let departures = normalize_departures(raw);
            debug!(stop = %monitor.stop_id(), departures = departures.len(), "poll succeeded");
            monitor.record_success(departures, Utc::now());
        }
        Err(e) => {
            monitor.record_failure(threshold);
            warn!(
                stop = %monitor.stop_id(),
                streak = monitor.failure_streak(),
                error = %e,
                "poll failed"
            );
        }
    }
}

/// Deterministic per-stop offset within the poll interval.
///
/// Hash-based rather than random so a stop keeps its slot across restarts.
fn stagger_offset(stop: &StopId, interval: Duration) -> Duration {
    let mut hasher = DefaultHasher::new();
    stop.hash(&mut hasher);

    let span_ms = interval.as_millis().max(1) as u64;
    Duration::from_millis(hasher.finish() % span_ms)
}

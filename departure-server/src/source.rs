//! The departure source: registry plus scheduler behind one seam.
//!
//! This is the capability a host adapter consumes: load the topology
//! registry once at setup, start polling, then read per-stop snapshots.
//! The host owns translating [`SensorState`] into whatever entity or
//! display abstraction it needs.

use std::sync::Arc;

use tracing::info;

use crate::domain::StopId;
use crate::poll::{MonitoredStop, PollConfig, PollScheduler, SensorState};
use crate::siri::DepartureFeed;
use crate::topology::{LookupError, StopRegistry, TopologyError, load_stops};

/// One stop requested by configuration.
#[derive(Debug, Clone)]
pub struct StopRequest {
    /// Authoritative stop id.
    pub id: StopId,

    /// Optional friendly name; falls back to the registry name, then to
    /// the id itself.
    pub display_name: Option<String>,
}

/// Live departure data for a set of monitored stops.
pub struct DepartureSource {
    registry: Arc<StopRegistry>,
    scheduler: PollScheduler,
}

impl DepartureSource {
    /// Download and build the stop registry.
    ///
    /// The one-time blocking setup step: it must complete before any
    /// polling starts, and failure is fatal for the configuration.
    pub async fn load_registry(
        client: &reqwest::Client,
        topology_url: &str,
    ) -> Result<StopRegistry, TopologyError> {
        let stops = load_stops(client, topology_url).await?;
        let registry = StopRegistry::build(stops);
        info!(stops = registry.len(), "stop registry built");
        Ok(registry)
    }

    /// Resolve the requested stops against the registry and start polling.
    ///
    /// A requested id absent from the registry is a [`LookupError`] and
    /// fails setup for the whole request set: a sensor for a stop that does
    /// not exist cannot be added.
    pub fn start<F: DepartureFeed>(
        registry: Arc<StopRegistry>,
        feed: Arc<F>,
        requests: Vec<StopRequest>,
        config: PollConfig,
    ) -> Result<Self, LookupError> {
        let mut monitored = Vec::with_capacity(requests.len());

        for request in requests {
            let stop = registry.resolve(&request.id)?;
            let name = request
                .display_name
                .unwrap_or_else(|| stop.name.clone());
            monitored.push(MonitoredStop {
                id: request.id,
                name,
            });
        }

        info!(stops = monitored.len(), "starting poll scheduler");
        let scheduler = PollScheduler::start(feed, monitored, config);

        Ok(Self {
            registry,
            scheduler,
        })
    }

    /// Latest snapshot for a monitored stop.
    pub fn get_state(&self, stop_id: &StopId) -> Option<SensorState> {
        self.scheduler.get_state(stop_id)
    }

    /// The shared stop registry.
    pub fn registry(&self) -> &Arc<StopRegistry> {
        &self.registry
    }

    /// Ids of all monitored stops.
    pub fn monitored_stops(&self) -> Vec<StopId> {
        self.scheduler.monitored_stops()
    }

    /// Tear down: cancel all polling tasks. The registry is dropped with
    /// the source; a restart requires a fresh registry load.
    pub async fn shutdown(self) {
        self.scheduler.shutdown().await;
    }
}

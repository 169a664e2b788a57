//! Per-stop polling and cached sensor state.
//!
//! One independent task per monitored stop fetches the real-time feed on a
//! staggered interval and maintains that stop's [`SensorState`] snapshot,
//! degrading to stale and then to no-data on consecutive failures.

mod scheduler;
mod state;

pub use scheduler::{MonitoredStop, PollConfig, PollScheduler, poll_once};
pub use state::{SensorState, SensorStatus, StopMonitor};

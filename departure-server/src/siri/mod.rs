//! SIRI StopMonitoring client.
//!
//! This module speaks the SIRI 2.0 StopMonitoring request/response
//! protocol: an XML `ServiceRequest` envelope is POSTed per stop, and the
//! `ServiceDelivery` response's `MonitoredStopVisit` entries come back as
//! [`RawDeparture`](crate::domain::RawDeparture)s.
//!
//! Provider quirks to be aware of:
//! - An empty delivery is a legitimate "no upcoming visits" answer, not
//!   an error.
//! - Visits flagged cancelled are excluded from results.
//! - `ExpectedDepartureTime` is only present once a real-time prediction
//!   exists; consumers fall back to the aimed time.

mod client;
mod error;
mod mock;
mod parse;
mod request;

pub use client::{SiriClient, SiriConfig};
pub use error::SiriError;
pub use mock::MockFeed;
pub use parse::parse_stop_monitoring;
pub use request::build_stop_monitoring_request;

use crate::domain::{RawDeparture, StopId};

/// The seam the poll scheduler fetches departures through.
///
/// Implemented by [`SiriClient`] for the real feed and by [`MockFeed`] in
/// tests, so scheduler behavior can be exercised without a network.
pub trait DepartureFeed: Send + Sync + 'static {
    /// Fetch the upcoming visits for one stop.
    ///
    /// An empty vector means the feed legitimately reports no upcoming
    /// departures; errors are reserved for transport and parse failures.
    fn fetch_departures(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Vec<RawDeparture>, SiriError>> + Send;
}

//! Mock departure feed for testing without a SIRI endpoint.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{RawDeparture, StopId};

use super::DepartureFeed;
use super::error::SiriError;

/// Scripted responses for one stop, served in order.
type Script = Vec<Result<Vec<RawDeparture>, SiriError>>;

/// Mock feed serving scripted per-stop responses.
///
/// Each call to [`DepartureFeed::fetch_departures`] pops the next scripted
/// result for that stop; when the script runs out, the last entry repeats.
/// Stops with no script at all answer with an empty delivery.
#[derive(Default)]
pub struct MockFeed {
    scripts: Mutex<HashMap<StopId, Script>>,
    calls: AtomicUsize,
}

impl MockFeed {
    /// Create an empty mock feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for a stop.
    pub fn push_success(&self, stop: &StopId, departures: Vec<RawDeparture>) {
        self.scripts
            .lock()
            .expect("mock feed lock poisoned")
            .entry(stop.clone())
            .or_default()
            .push(Ok(departures));
    }

    /// Queue a failure for a stop.
    pub fn push_failure(&self, stop: &StopId, status: u16) {
        self.scripts
            .lock()
            .expect("mock feed lock poisoned")
            .entry(stop.clone())
            .or_default()
            .push(Err(SiriError::Api {
                status,
                message: "scripted failure".to_string(),
            }));
    }

    /// Total number of fetches served across all stops.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DepartureFeed for MockFeed {
    async fn fetch_departures(&self, stop: &StopId) -> Result<Vec<RawDeparture>, SiriError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut scripts = self.scripts.lock().expect("mock feed lock poisoned");
        let Some(script) = scripts.get_mut(stop) else {
            return Ok(Vec::new());
        };

        let next = if script.len() > 1 {
            script.remove(0)
        } else {
            match script.first() {
                Some(entry) => clone_result(entry),
                None => return Ok(Vec::new()),
            }
        };

        next
    }
}

/// `SiriError` holds a `reqwest::Error` in one variant and so cannot derive
/// `Clone`; scripted entries only ever use the cloneable variants.
fn clone_result(
    entry: &Result<Vec<RawDeparture>, SiriError>,
) -> Result<Vec<RawDeparture>, SiriError> {
    match entry {
        Ok(departures) => Ok(departures.clone()),
        Err(SiriError::Api { status, message }) => Err(SiriError::Api {
            status: *status,
            message: message.clone(),
        }),
        Err(SiriError::Xml { message }) => Err(SiriError::Xml {
            message: message.clone(),
        }),
        Err(SiriError::Http(_)) => Err(SiriError::Api {
            status: 0,
            message: "scripted http failure".to_string(),
        }),
    }
}

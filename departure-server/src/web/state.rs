//! Application state for the web layer.

use std::sync::Arc;

use crate::source::DepartureSource;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The live departure source (registry + scheduler).
    pub source: Arc<DepartureSource>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(source: DepartureSource) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

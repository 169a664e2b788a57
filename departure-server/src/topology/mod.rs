//! Topology document loading and the stop registry.
//!
//! The topology document is a NeTEx XML file describing a network's stops.
//! It is downloaded and parsed exactly once per process, producing an
//! immutable [`StopRegistry`] that maps stop ids to names and supports a
//! normalized-name fallback lookup.

mod error;
mod loader;
mod normalize;
mod registry;

pub use error::{LookupError, TopologyError};
pub use loader::{load_stops, parse_stops};
pub use normalize::normalize_name;
pub use registry::StopRegistry;

//! Topology loading and lookup error types.

use crate::domain::StopId;

/// Errors that can occur while loading the topology document.
///
/// All of these are fatal at setup: without a registry there is nothing to
/// resolve configured stops against.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("failed to download topology document: {0}")]
    Download(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("topology endpoint returned HTTP {status}")]
    Http { status: u16 },

    /// The document is not well-formed XML
    #[error("malformed topology document: {message}")]
    Xml { message: String },
}

/// A configured stop id was not found in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stop {0} not found in topology registry")]
pub struct LookupError(pub StopId);

//! SIRI client error types.

/// Errors from the SIRI StopMonitoring client.
///
/// During steady-state polling these are all recoverable: the scheduler
/// degrades the affected stop to stale and retries on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum SiriError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned an error status code
    #[error("SIRI endpoint returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response XML could not be parsed
    #[error("SIRI response parse error: {message}")]
    Xml { message: String },
}

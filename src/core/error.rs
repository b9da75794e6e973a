//! Error taxonomy for rate retrieval.
//!
//! Every variant is recovered locally and shown to the user, so the
//! `Display` text of each variant is the message that ends up on screen.

use thiserror::Error;

/// A failure to reach the rate store or to make sense of its response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Server connection error: {0}")]
    Transport(String),

    #[error("Rates not found. Requesting them from the central bank...")]
    DataAbsent,

    #[error("Failed to refresh rates: {0}")]
    UpstreamRefreshFailed(String),

    #[error("Rates were refreshed but are still missing from the store")]
    PostRefreshInconsistency,
}

impl From<TransportError> for RetrievalError {
    fn from(e: TransportError) -> Self {
        RetrievalError::Transport(e.0)
    }
}

//! Core retrieval logic and the abstractions it depends on

pub mod config;
pub mod error;
pub mod history;
pub mod log;
pub mod presentation;
pub mod rates;
pub mod refresh;
pub mod retrieval;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for cleaner imports
pub use error::{RetrievalError, TransportError};
pub use history::{HistoryRow, HistorySource, HistoryView, HistoryViewModel};
pub use presentation::{PresentationSink, UiState};
pub use rates::{DateInput, RateQuery, RateSet, RateStore};
pub use refresh::{RefreshOutcome, UpstreamRefresher};
pub use retrieval::{RetrievalOrchestrator, RetrievalOutcome};

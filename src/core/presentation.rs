//! The boundary between retrieval logic and whatever displays its results.

use super::history::HistoryView;
use super::rates::RateSet;
use std::sync::Arc;

/// Display state for the rate query regions.
///
/// Each orchestration step produces a new value; rendering it is the only
/// way results reach the screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub loading: bool,
    pub error_message: Option<String>,
    /// `error_message` is a progress notice rather than a failure.
    pub interim: bool,
    pub result: Option<RateSet>,
}

impl UiState {
    /// Fresh state for a new query: no stale error or result.
    pub fn started() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            interim: false,
            ..self
        }
    }

    /// Shows `message` in the error region while the query is still running.
    pub fn with_interim(self, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            interim: true,
            ..self
        }
    }

    pub fn with_result(self, result: RateSet) -> Self {
        Self {
            error_message: None,
            interim: false,
            result: Some(result),
            ..self
        }
    }

    pub fn finished(self) -> Self {
        Self {
            loading: false,
            ..self
        }
    }
}

pub trait PresentationSink: Send + Sync {
    /// Writes the error, result and query loading regions.
    fn render(&self, state: &UiState);

    fn render_history(&self, view: &HistoryView);

    /// Loading flag of the history region, independent of `UiState::loading`.
    fn set_history_loading(&self, loading: bool);
}

/// Turns the history loading flag on and clears it again when dropped,
/// whichever way the enclosing scope is left.
pub struct LoadingGuard {
    sink: Arc<dyn PresentationSink>,
}

impl LoadingGuard {
    pub fn start(sink: Arc<dyn PresentationSink>) -> Self {
        sink.set_history_loading(true);
        Self { sink }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.sink.set_history_loading(false);
    }
}

//! In-process fakes for the collaborator traits.

use super::error::TransportError;
use super::history::{HistoryRow, HistorySource, HistoryView};
use super::presentation::{PresentationSink, UiState};
use super::rates::{RateQuery, RateSet, RateStore};
use super::refresh::{RefreshOutcome, UpstreamRefresher};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StoreRead(String),
    Refresh(String),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Answers store reads from a queue, one response per read.
pub struct ScriptedStore {
    responses: Mutex<VecDeque<Result<Option<RateSet>, TransportError>>>,
    log: CallLog,
}

impl ScriptedStore {
    pub fn new(responses: Vec<Result<Option<RateSet>, TransportError>>, log: CallLog) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            log,
        }
    }
}

#[async_trait]
impl RateStore for ScriptedStore {
    async fn fetch_rates(&self, query: &RateQuery) -> Result<Option<RateSet>, TransportError> {
        self.log
            .lock()
            .unwrap()
            .push(Call::StoreRead(query.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("unexpected store read".to_string())))
    }
}

pub struct ScriptedUpstream {
    outcome: RefreshOutcome,
    log: CallLog,
}

impl ScriptedUpstream {
    pub fn new(outcome: RefreshOutcome, log: CallLog) -> Self {
        Self { outcome, log }
    }
}

#[async_trait]
impl UpstreamRefresher for ScriptedUpstream {
    async fn request_refresh(&self, query: &RateQuery) -> RefreshOutcome {
        self.log.lock().unwrap().push(Call::Refresh(query.to_string()));
        self.outcome.clone()
    }
}

pub struct StaticHistory {
    response: Result<Vec<HistoryRow>, TransportError>,
    limits: Mutex<Vec<usize>>,
}

impl StaticHistory {
    pub fn rows(rows: Vec<HistoryRow>) -> Self {
        Self {
            response: Ok(rows),
            limits: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(TransportError(message.to_string())),
            limits: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_limits(&self) -> Vec<usize> {
        self.limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistorySource for StaticHistory {
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRow>, TransportError> {
        self.limits.lock().unwrap().push(limit);
        self.response.clone()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    states: Mutex<Vec<UiState>>,
    histories: Mutex<Vec<HistoryView>>,
    loading: Mutex<Vec<bool>>,
}

impl RecordingSink {
    pub fn states(&self) -> Vec<UiState> {
        self.states.lock().unwrap().clone()
    }

    pub fn last_state(&self) -> Option<UiState> {
        self.states.lock().unwrap().last().cloned()
    }

    pub fn histories(&self) -> Vec<HistoryView> {
        self.histories.lock().unwrap().clone()
    }

    pub fn loading_changes(&self) -> Vec<bool> {
        self.loading.lock().unwrap().clone()
    }
}

impl PresentationSink for RecordingSink {
    fn render(&self, state: &UiState) {
        self.states.lock().unwrap().push(state.clone());
    }

    fn render_history(&self, view: &HistoryView) {
        self.histories.lock().unwrap().push(view.clone());
    }

    fn set_history_loading(&self, loading: bool) {
        self.loading.lock().unwrap().push(loading);
    }
}

//! Cache-first rate retrieval.
//!
//! A query first reads the store. On a miss the upstream provider is asked
//! to populate it, and after a fixed delay the store is read exactly once
//! more. The machine never loops on its own; a new query starts over and
//! invalidates whatever an older query still has pending.

use super::error::RetrievalError;
use super::presentation::{PresentationSink, UiState};
use super::rates::{DateInput, RateQuery, RateSet, RateStore};
use chrono::NaiveDate;
use super::refresh::{RefreshOutcome, UpstreamRefresher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_RECHECK_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// The store already had the rates.
    Hit(RateSet),
    /// The store was empty, the upstream refresh populated it.
    Resolved(RateSet),
    Failed(RetrievalError),
    /// A newer query started before this one finished; nothing was displayed.
    Superseded,
}

pub struct RetrievalOrchestrator {
    store: Arc<dyn RateStore>,
    upstream: Arc<dyn UpstreamRefresher>,
    sink: Arc<dyn PresentationSink>,
    recheck_delay: Duration,
    generation: AtomicU64,
}

impl RetrievalOrchestrator {
    pub fn new(
        store: Arc<dyn RateStore>,
        upstream: Arc<dyn UpstreamRefresher>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            store,
            upstream,
            sink,
            recheck_delay: DEFAULT_RECHECK_DELAY,
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_recheck_delay(mut self, delay: Duration) -> Self {
        self.recheck_delay = delay;
        self
    }

    /// Runs one query for raw user input. Invalid input is reported without
    /// touching the network.
    pub async fn get_rates(&self, input: &str) -> RetrievalOutcome {
        self.resolve_and_retrieve(RateQuery::parse(input)).await
    }

    /// Like [`get_rates`](Self::get_rates), for a date typed or picked relative to `today`.
    pub async fn get_rates_for(&self, input: &DateInput, today: NaiveDate) -> RetrievalOutcome {
        self.resolve_and_retrieve(input.resolve(today)).await
    }

    async fn resolve_and_retrieve(
        &self,
        query: Result<RateQuery, RetrievalError>,
    ) -> RetrievalOutcome {
        match query {
            Ok(query) => self.retrieve(query).await,
            Err(e) => {
                self.supersede();
                self.sink.render(&UiState::default().with_error(e.to_string()));
                RetrievalOutcome::Failed(e)
            }
        }
    }

    #[instrument(name = "RateRetrieval", skip(self), fields(date = %query))]
    pub async fn retrieve(&self, query: RateQuery) -> RetrievalOutcome {
        let ticket = self.supersede();

        let state = UiState::started();
        self.sink.render(&state);

        let (outcome, state) = self.run(&query, ticket, state).await;
        if !matches!(outcome, RetrievalOutcome::Superseded) {
            self.sink.render(&state.finished());
        }
        outcome
    }

    /// Takes a new ticket, invalidating every older one.
    fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    async fn run(
        &self,
        query: &RateQuery,
        ticket: u64,
        state: UiState,
    ) -> (RetrievalOutcome, UiState) {
        let lookup = self.store.fetch_rates(query).await;
        if !self.is_current(ticket) {
            return (RetrievalOutcome::Superseded, state);
        }

        match lookup {
            Ok(Some(rates)) => {
                debug!("Store hit");
                return (RetrievalOutcome::Hit(rates.clone()), state.with_result(rates));
            }
            Ok(None) => {}
            // A transport error says nothing about absence, so no refresh.
            Err(e) => return fail(state, e.into()),
        }

        info!("Rates missing from store, requesting upstream refresh");
        let state = state.with_interim(RetrievalError::DataAbsent.to_string());
        self.sink.render(&state);

        let refresh = self.upstream.request_refresh(query).await;
        if !self.is_current(ticket) {
            return (RetrievalOutcome::Superseded, state);
        }
        if let RefreshOutcome::Failure(message) = refresh {
            return fail(state, RetrievalError::UpstreamRefreshFailed(message));
        }

        debug!(delay_ms = self.recheck_delay.as_millis() as u64, "Waiting before re-check");
        tokio::time::sleep(self.recheck_delay).await;
        if !self.is_current(ticket) {
            debug!("Re-check cancelled by a newer query");
            return (RetrievalOutcome::Superseded, state);
        }

        let recheck = self.store.fetch_rates(query).await;
        if !self.is_current(ticket) {
            return (RetrievalOutcome::Superseded, state);
        }

        match recheck {
            Ok(Some(rates)) => (
                RetrievalOutcome::Resolved(rates.clone()),
                state.with_result(rates),
            ),
            Ok(None) => fail(state, RetrievalError::PostRefreshInconsistency),
            Err(e) => {
                warn!(error = %e, "Re-check after refresh failed");
                fail(state, RetrievalError::PostRefreshInconsistency)
            }
        }
    }
}

fn fail(state: UiState, error: RetrievalError) -> (RetrievalOutcome, UiState) {
    warn!(error = %error, "Rate retrieval failed");
    let state = state.with_error(error.to_string());
    (RetrievalOutcome::Failed(error), state)
}

//! Recently saved rate rows and their display model.

use super::error::TransportError;
use super::presentation::{LoadingGuard, PresentationSink};
use super::rates::format_rate;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Shown in place of a value the store did not provide.
pub const UNKNOWN_VALUE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub currency: String,
    pub rate: f64,
    /// Raw store timestamp, e.g. `2024-01-10 12:30:00`.
    pub saved_at: Option<String>,
}

impl HistoryRow {
    /// Date portion of `saved_at`; the time of day is dropped.
    pub fn saved_on(&self) -> Option<&str> {
        self.saved_at
            .as_deref()
            .and_then(|ts| ts.split([' ', 'T']).next())
            .filter(|d| !d.is_empty())
    }
}

/// Most-recent-first history rows. The store enforces `limit`.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRow>, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryDisplayRow {
    pub date: String,
    pub currency: String,
    pub rate: String,
    pub saved: String,
}

impl From<&HistoryRow> for HistoryDisplayRow {
    fn from(row: &HistoryRow) -> Self {
        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            currency: row.currency.clone(),
            rate: format_rate(row.rate),
            saved: row.saved_on().unwrap_or(UNKNOWN_VALUE).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Empty,
    Rows(Vec<HistoryDisplayRow>),
    Failed(String),
}

impl HistoryView {
    pub fn from_rows(rows: &[HistoryRow]) -> Self {
        if rows.is_empty() {
            HistoryView::Empty
        } else {
            HistoryView::Rows(rows.iter().map(HistoryDisplayRow::from).collect())
        }
    }
}

pub struct HistoryViewModel {
    source: Arc<dyn HistorySource>,
    sink: Arc<dyn PresentationSink>,
}

impl HistoryViewModel {
    pub fn new(source: Arc<dyn HistorySource>, sink: Arc<dyn PresentationSink>) -> Self {
        Self { source, sink }
    }

    pub async fn load(&self, limit: usize) -> HistoryView {
        let _loading = LoadingGuard::start(Arc::clone(&self.sink));

        let view = match self.source.fetch_history(limit).await {
            Ok(rows) => {
                debug!(rows = rows.len(), "Loaded history");
                HistoryView::from_rows(&rows)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load history");
                HistoryView::Failed("Failed to load history".to_string())
            }
        };

        self.sink.render_history(&view);
        view
    }
}

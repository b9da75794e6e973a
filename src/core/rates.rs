//! Rate queries, rate sets and the store abstraction that serves them.

use super::error::{RetrievalError, TransportError};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta};
use std::fmt::Display;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A request for all rates published on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateQuery {
    pub date: NaiveDate,
}

impl RateQuery {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Validates raw user input. Only `YYYY-MM-DD` without a time or zone is accepted.
    pub fn parse(input: &str) -> Result<Self, RetrievalError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RetrievalError::InvalidInput("Please enter a date".to_string()));
        }

        let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
            .ok()
            .filter(|_| input.len() == 10)
            .ok_or_else(|| {
                RetrievalError::InvalidInput(format!(
                    "Invalid date '{input}', expected YYYY-MM-DD"
                ))
            })?;
        Ok(Self { date })
    }

    /// Quick-period shortcut: `today` shifted by `days` (negative goes back).
    pub fn from_offset(today: NaiveDate, days: i64) -> Result<Self, RetrievalError> {
        TimeDelta::try_days(days)
            .and_then(|delta| today.checked_add_signed(delta))
            .map(Self::new)
            .ok_or_else(|| {
                RetrievalError::InvalidInput(format!("Offset of {days} days is out of range"))
            })
    }
}

/// How the user picked the date, before it is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Text(String),
    /// Days relative to today; `Offset(0)` is today.
    Offset(i64),
}

impl DateInput {
    pub fn resolve(&self, today: NaiveDate) -> Result<RateQuery, RetrievalError> {
        match self {
            DateInput::Text(input) => RateQuery::parse(input),
            DateInput::Offset(days) => RateQuery::from_offset(today, *days),
        }
    }
}

impl Display for RateQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format(DATE_FORMAT))
    }
}

/// Rates for a single date, in the order the store returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSet {
    pub date: NaiveDate,
    pub rates: Vec<(String, f64)>,
}

impl RateSet {
    pub fn title(&self) -> String {
        format!("Rates for {}", self.date.format(DATE_FORMAT))
    }

    /// `[currency, rate]` pairs ready for display.
    pub fn formatted_rows(&self) -> Vec<[String; 2]> {
        self.rates
            .iter()
            .map(|(code, rate)| [code.clone(), format_rate(*rate)])
            .collect()
    }
}

/// Rates are always shown with five decimals.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.5}")
}

/// Read-only access to the local rate store.
///
/// `Ok(None)` means the store answered but holds nothing for the date;
/// `Err` means the store could not be reached or answered with garbage.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn fetch_rates(&self, query: &RateQuery) -> Result<Option<RateSet>, TransportError>;
}

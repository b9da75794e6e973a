//! Triggering the upstream provider to populate the store.

use super::rates::RateQuery;
use async_trait::async_trait;

/// Whether the upstream accepted the refresh request.
///
/// Success only acknowledges the request; it says nothing about whether
/// the store was actually written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Success,
    Failure(String),
}

/// Calls the upstream provider for a date. Calls are not idempotent and
/// may duplicate upstream work, so callers should keep them rare.
#[async_trait]
pub trait UpstreamRefresher: Send + Sync {
    async fn request_refresh(&self, query: &RateQuery) -> RefreshOutcome;
}

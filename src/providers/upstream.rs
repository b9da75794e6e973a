use super::util::{http_client, with_param};
use crate::core::{RateQuery, RefreshOutcome, UpstreamRefresher};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Triggers the cloud function that pulls rates from the central bank into the store.
pub struct HttpUpstreamClient {
    url: String,
}

impl HttpUpstreamClient {
    pub fn new(url: &str) -> Self {
        HttpUpstreamClient {
            url: url.to_string(),
        }
    }

    async fn send(&self, query: &RateQuery) -> Result<RefreshOutcome> {
        let url = with_param(&self.url, "date", query);
        debug!("Requesting upstream refresh from {}", url);

        let response = http_client()?
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for date: {}", e, query))?;

        let status = response.status();
        let text = response.text().await?;
        // Success bodies are arbitrary; only an `error` field matters.
        let reported = serde_json::from_str::<UpstreamBody>(&text)
            .ok()
            .and_then(|body| body.error);

        let outcome = match (status.is_success(), reported) {
            (_, Some(error)) => RefreshOutcome::Failure(error),
            (true, None) => RefreshOutcome::Success,
            (false, None) => RefreshOutcome::Failure(format!("HTTP error: {status}")),
        };
        Ok(outcome)
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamBody {
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl UpstreamRefresher for HttpUpstreamClient {
    #[instrument(name = "UpstreamRefresh", skip(self), fields(date = %query))]
    async fn request_refresh(&self, query: &RateQuery) -> RefreshOutcome {
        match self.send(query).await {
            Ok(outcome) => {
                debug!(?outcome, "Upstream refresh answered");
                outcome
            }
            Err(e) => {
                warn!(error = %e, "Upstream refresh request failed");
                RefreshOutcome::Failure(e.to_string())
            }
        }
    }
}

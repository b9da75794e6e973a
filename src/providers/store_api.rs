use super::util::{http_client, with_param};
use crate::core::{HistoryRow, HistorySource, RateQuery, RateSet, RateStore, TransportError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Client for the local rate store's `/api/rates` and `/api/history` endpoints.
pub struct HttpStoreClient {
    base_url: String,
}

impl HttpStoreClient {
    pub fn new(base_url: &str) -> Self {
        HttpStoreClient {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, TransportError> {
        debug!("Requesting {}", url);
        let response = http_client()?
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError(format!("Request error: {e} for URL: {url}")))?;

        if !response.status().is_success() {
            return Err(TransportError(format!("HTTP error: {}", response.status())));
        }

        Ok(response.text().await?)
    }
}

// `{date, rates}` on success, `{rates: null}` or `{error}` when the store has nothing.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    date: Option<String>,
    #[serde(default)]
    rates: Option<Map<String, Value>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    date: String,
    currency: String,
    rate: f64,
    #[serde(default)]
    saved_at: Option<String>,
}

fn parse_date(value: &str) -> Result<NaiveDate, TransportError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| TransportError(format!("Invalid date '{value}' in store response: {e}")))
}

fn parse_rate(code: &str, value: &Value) -> Result<f64, TransportError> {
    value
        .as_f64()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or_else(|| TransportError(format!("Invalid rate for {code}: {value}")))
}

fn into_rate_set(
    query: &RateQuery,
    response: RatesResponse,
) -> Result<Option<RateSet>, TransportError> {
    if let Some(error) = response.error {
        debug!(%error, "Store reported no data");
        return Ok(None);
    }

    let rates = match response.rates {
        Some(rates) if !rates.is_empty() => rates,
        _ => return Ok(None),
    };

    let date = match response.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => query.date,
    };

    let rates = rates
        .iter()
        .map(|(code, value)| -> Result<(String, f64), TransportError> {
            Ok((code.clone(), parse_rate(code, value)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(RateSet { date, rates }))
}

#[async_trait]
impl RateStore for HttpStoreClient {
    #[instrument(name = "StoreRatesFetch", skip(self), fields(date = %query))]
    async fn fetch_rates(&self, query: &RateQuery) -> Result<Option<RateSet>, TransportError> {
        let url = with_param(&format!("{}/api/rates", self.base_url), "date", query);
        let text = self.get_text(&url).await?;

        let response: RatesResponse = serde_json::from_str(&text).map_err(|e| {
            TransportError(format!("Failed to parse rates response for {query}: {e}"))
        })?;

        into_rate_set(query, response)
    }
}

#[async_trait]
impl HistorySource for HttpStoreClient {
    #[instrument(name = "StoreHistoryFetch", skip(self))]
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRow>, TransportError> {
        let url = with_param(&format!("{}/api/history", self.base_url), "limit", limit);
        let text = self.get_text(&url).await?;

        let response: HistoryResponse = serde_json::from_str(&text)
            .map_err(|e| TransportError(format!("Failed to parse history response: {e}")))?;

        response
            .history
            .unwrap_or_default()
            .into_iter()
            .map(|entry| -> Result<HistoryRow, TransportError> {
                Ok(HistoryRow {
                    date: parse_date(&entry.date)?,
                    currency: entry.currency,
                    rate: entry.rate,
                    saved_at: entry.saved_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::util::closed_port_url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_rates_server(date: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/rates"))
            .and(query_param("date", date))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    async fn create_history_server(limit: &str, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/history"))
            .and(query_param("limit", limit))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn query(date: &str) -> RateQuery {
        RateQuery::parse(date).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_rates_keeps_store_order() {
        let body = r#"{"date": "2024-01-10", "rates": {"USD": 91.2345, "EUR": 99.8765, "AMD": 0.22413}}"#;
        let mock_server = create_rates_server("2024-01-10", 200, body).await;
        let client = HttpStoreClient::new(&mock_server.uri());

        let set = client
            .fetch_rates(&query("2024-01-10"))
            .await
            .unwrap()
            .expect("rates should be present");

        assert_eq!(set.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        let codes: Vec<&str> = set.rates.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["USD", "EUR", "AMD"]);
        assert_eq!(set.rates[0].1, 91.2345);
    }

    #[tokio::test]
    async fn test_null_rates_is_absent() {
        let mock_server = create_rates_server("2024-01-10", 200, r#"{"rates": null}"#).await;
        let client = HttpStoreClient::new(&mock_server.uri());

        assert_eq!(client.fetch_rates(&query("2024-01-10")).await, Ok(None));
    }

    #[tokio::test]
    async fn test_empty_rates_is_absent() {
        let body = r#"{"date": "2024-01-10", "rates": {}}"#;
        let mock_server = create_rates_server("2024-01-10", 200, body).await;
        let client = HttpStoreClient::new(&mock_server.uri());

        assert_eq!(client.fetch_rates(&query("2024-01-10")).await, Ok(None));
    }

    #[tokio::test]
    async fn test_error_field_is_absent() {
        let body = r#"{"error": "Could not get data from the central bank"}"#;
        let mock_server = create_rates_server("2024-01-10", 200, body).await;
        let client = HttpStoreClient::new(&mock_server.uri());

        assert_eq!(client.fetch_rates(&query("2024-01-10")).await, Ok(None));
    }

    #[tokio::test]
    async fn test_http_error_is_transport_error() {
        let mock_server = create_rates_server("2024-01-10", 500, "").await;
        let client = HttpStoreClient::new(&mock_server.uri());

        let err = client.fetch_rates(&query("2024-01-10")).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error: 500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let mock_server = create_rates_server("2024-01-10", 200, "<html>oops</html>").await;
        let client = HttpStoreClient::new(&mock_server.uri());

        let err = client.fetch_rates(&query("2024-01-10")).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Failed to parse rates response for 2024-01-10")
        );
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_transport_error() {
        let body = r#"{"date": "2024-01-10", "rates": {"USD": -1.0}}"#;
        let mock_server = create_rates_server("2024-01-10", 200, body).await;
        let client = HttpStoreClient::new(&mock_server.uri());

        let err = client.fetch_rates(&query("2024-01-10")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid rate for USD: -1.0");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() {
        let client = HttpStoreClient::new(&closed_port_url());

        let err = client.fetch_rates(&query("2024-01-10")).await.unwrap_err();
        assert!(
            err.to_string().starts_with("Request error:"),
            "unexpected error: {err}"
        );
        assert!(client.fetch_history(30).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_history() {
        let body = r#"{"history": [
            {"date": "2024-01-10", "currency": "USD", "rate": 91.2345, "saved_at": "2024-01-11 08:15:00"},
            {"date": "2024-01-09", "currency": "EUR", "rate": 99.8765}
        ]}"#;
        let mock_server = create_history_server("30", body).await;
        let client = HttpStoreClient::new(&format!("{}/", mock_server.uri()));

        let rows = client.fetch_history(30).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].currency, "USD");
        assert_eq!(rows[0].saved_on(), Some("2024-01-11"));
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(rows[1].saved_at, None);
    }

    #[tokio::test]
    async fn test_fetch_history_missing_field_is_empty() {
        let mock_server = create_history_server("5", "{}").await;
        let client = HttpStoreClient::new(&mock_server.uri());

        assert_eq!(client.fetch_history(5).await, Ok(vec![]));
    }
}

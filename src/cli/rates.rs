use super::sink::TerminalSink;
use super::ui;
use crate::core::config::AppConfig;
use crate::core::{
    DateInput, HistoryViewModel, PresentationSink, RateSet, RetrievalOrchestrator,
    RetrievalOutcome,
};
use crate::providers::{HttpStoreClient, HttpUpstreamClient};
use anyhow::Result;
use chrono::Local;
use comfy_table::Cell;
use std::sync::Arc;
use tracing::debug;

impl RateSet {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate")]);

        for [code, rate] in self.formatted_rows() {
            table.add_row(vec![Cell::new(code), ui::rate_cell(&rate)]);
        }

        format!(
            "{}\n\n{}",
            ui::style_text(&self.title(), ui::StyleType::Title),
            table
        )
    }
}

/// Looks up rates for `input`, optionally showing history before and after.
pub async fn run(
    config: &AppConfig,
    input: &DateInput,
    with_history: bool,
) -> Result<RetrievalOutcome> {
    let today = Local::now().date_naive();
    let sink: Arc<dyn PresentationSink> = Arc::new(TerminalSink::new());
    let store = Arc::new(HttpStoreClient::new(&config.store.base_url));
    let upstream = Arc::new(HttpUpstreamClient::new(&config.upstream.url));

    let orchestrator = RetrievalOrchestrator::new(store.clone(), upstream, Arc::clone(&sink))
        .with_recheck_delay(config.recheck_delay());

    if !with_history {
        return Ok(orchestrator.get_rates_for(input, today).await);
    }

    let history = HistoryViewModel::new(store, sink);
    let (outcome, _) = futures::join!(
        orchestrator.get_rates_for(input, today),
        history.load(config.history_limit)
    );

    // The store only changes when a refresh went through.
    if let RetrievalOutcome::Resolved(_) = outcome {
        debug!("Store was updated, reloading history");
        ui::print_separator();
        history.load(config.history_limit).await;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_rate_table_rows_follow_store_order() {
        let set = RateSet {
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            rates: vec![("USD".to_string(), 91.2345), ("EUR".to_string(), 99.8765)],
        };

        let output = console::strip_ansi_codes(&set.display_as_table()).to_string();

        assert!(output.starts_with("Rates for 2024-01-10"));
        assert!(output.contains("Currency"));
        let usd = output.find("91.23450").expect("USD rate missing");
        let eur = output.find("99.87650").expect("EUR rate missing");
        assert!(usd < eur);
    }
}

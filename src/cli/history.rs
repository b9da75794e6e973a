use super::sink::TerminalSink;
use super::ui;
use crate::core::config::AppConfig;
use crate::core::history::UNKNOWN_VALUE;
use crate::core::{HistoryView, HistoryViewModel};
use crate::providers::HttpStoreClient;
use comfy_table::Cell;
use std::sync::Arc;

impl HistoryView {
    pub fn display_as_table(&self) -> String {
        let rows = match self {
            HistoryView::Empty => return ui::style_text("History is empty", ui::StyleType::Subtle),
            HistoryView::Failed(message) => return ui::style_text(message, ui::StyleType::Error),
            HistoryView::Rows(rows) => rows,
        };

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Rate date"),
            ui::header_cell("Currency"),
            ui::header_cell("Rate"),
            ui::header_cell("Saved"),
        ]);

        for row in rows {
            let saved = if row.saved == UNKNOWN_VALUE {
                ui::na_cell(&row.saved)
            } else {
                Cell::new(&row.saved)
            };
            table.add_row(vec![
                Cell::new(&row.date),
                Cell::new(&row.currency),
                ui::rate_cell(&row.rate),
                saved,
            ]);
        }

        format!(
            "{}\n\n{}",
            ui::style_text("History", ui::StyleType::Title),
            table
        )
    }
}

pub async fn run(config: &AppConfig, limit: Option<usize>) -> HistoryView {
    let store = Arc::new(HttpStoreClient::new(&config.store.base_url));
    let model = HistoryViewModel::new(store, Arc::new(TerminalSink::new()));
    model.load(limit.unwrap_or(config.history_limit)).await
}

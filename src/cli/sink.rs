use super::ui;
use crate::core::{HistoryView, PresentationSink, UiState};
use indicatif::ProgressBar;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Which regions are waiting on the network. The spinner runs while any is.
#[derive(Default)]
struct Loading {
    query: bool,
    history: bool,
    spinner: Option<ProgressBar>,
}

impl Loading {
    fn update(&mut self) {
        match (self.query || self.history, self.spinner.take()) {
            (true, None) => self.spinner = Some(ui::new_spinner("Loading...")),
            (true, Some(pb)) => self.spinner = Some(pb),
            (false, Some(pb)) => pb.finish_and_clear(),
            (false, None) => {}
        }
    }
}

/// Writes rendered state to the terminal.
///
/// A terminal cannot overwrite a region in place, so only regions that
/// changed since the last render are printed.
#[derive(Default)]
pub struct TerminalSink {
    shown: Mutex<UiState>,
    loading: Mutex<Loading>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.loading).spinner.is_some()
    }

    /// The "not found" notice is progress, not a failure.
    fn message_style(state: &UiState) -> ui::StyleType {
        if state.interim {
            ui::StyleType::Subtle
        } else {
            ui::StyleType::Error
        }
    }
}

impl PresentationSink for TerminalSink {
    fn render(&self, state: &UiState) {
        let mut shown = lock(&self.shown);

        if state.error_message != shown.error_message {
            if let Some(message) = &state.error_message {
                println!("{}", ui::style_text(message, Self::message_style(state)));
            }
        }
        if state.result != shown.result {
            if let Some(rates) = &state.result {
                println!("{}", rates.display_as_table());
            }
        }
        *shown = state.clone();
        drop(shown);

        let mut loading = lock(&self.loading);
        loading.query = state.loading;
        loading.update();
    }

    fn render_history(&self, view: &HistoryView) {
        println!("{}", view.display_as_table());
    }

    fn set_history_loading(&self, is_loading: bool) {
        let mut loading = lock(&self.loading);
        loading.history = is_loading;
        loading.update();
    }
}

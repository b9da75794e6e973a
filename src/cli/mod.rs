//! Terminal presentation and command implementations

pub mod history;
pub mod rates;
pub mod setup;
pub mod sink;
pub mod ui;

#![doc(test(attr(deny(warnings))))]

//! Spendora core: the ledger engine behind a personal income and expense
//! tracker, with a key-value persistence layer and a command-line shell.

pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod time;
pub mod tracker;
pub mod utils;

pub use errors::{LedgerError, Result, ValidationErrors};
pub use ledger::Ledger;
pub use tracker::BudgetTracker;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Spendora tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

//! The ledger engine: an ordered transaction collection plus the settings
//! used to present it, and the pure aggregates derived from it.

pub mod export;
pub mod filter;
pub mod insights;
pub mod period;
pub mod report;
pub mod summary;

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::currency::{format_currency, CurrencyCode};
use crate::domain::{Settings, Transaction, TransactionId, TransactionInput};
use crate::errors::{Result, ValidationErrors};

pub use export::{export_file_name, to_csv, write_csv_export, CSV_HEADER, CSV_MIME_TYPE};
pub use filter::{filter, paginate, sort_newest_first, FilterCriteria, Page};
pub use insights::{insights, Insight, Severity};
pub use period::{period_window, DateWindow, Period};
pub use report::{build_report, Report};
pub use summary::{
    category_totals, chart_data, compute_balance, totals, CategoryStats, CategoryTotals,
    ChartData, Totals,
};

/// Data handed to the chart layer for the dashboard breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub category_totals: CategoryTotals,
    pub chart: ChartData,
    pub stats: CategoryStats,
    pub balance: f64,
    pub currency: CurrencyCode,
}

/// Newest-first collection of transactions and the active settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    settings: Settings,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(transactions: Vec<Transaction>, settings: Settings) -> Self {
        Self {
            transactions,
            settings,
        }
    }

    /// Records in display order; index 0 is the newest.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.settings.currency
    }

    pub fn set_currency(&mut self, code: &str) -> Result<()> {
        self.settings.set_currency(code)
    }

    pub fn set_starting_balance(&mut self, balance: f64) {
        self.settings.balance = balance;
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    /// Validates `input` and prepends the new record.
    pub fn create(
        &mut self,
        input: TransactionInput,
        today: NaiveDate,
    ) -> std::result::Result<&Transaction, ValidationErrors> {
        let txn = Transaction::create(input, today)?;
        tracing::debug!(id = %txn.id(), "transaction created");
        self.transactions.insert(0, txn);
        Ok(&self.transactions[0])
    }

    /// Removes the record with `id`; unknown ids are ignored.
    pub fn delete(&mut self, id: &TransactionId) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.id() != id);
        before != self.transactions.len()
    }

    /// Removes every record whose id is listed and returns how many were removed.
    pub fn delete_many<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a TransactionId>,
    {
        let ids: HashSet<&TransactionId> = ids.into_iter().collect();
        let before = self.transactions.len();
        self.transactions.retain(|txn| !ids.contains(txn.id()));
        before - self.transactions.len()
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
        self.settings = Settings::default();
    }

    /// Balance including the configured starting balance.
    pub fn balance(&self) -> f64 {
        compute_balance(&self.transactions, self.settings.balance)
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format_currency(amount, self.settings.currency.as_str())
    }

    pub fn recent(&self, count: usize) -> &[Transaction] {
        &self.transactions[..count.min(self.transactions.len())]
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Transaction> {
        filter(&self.transactions, criteria)
    }

    pub fn breakdown(&self) -> Breakdown {
        let totals = category_totals(&self.transactions);
        Breakdown {
            chart: chart_data(&totals),
            stats: summary::category_stats(&totals),
            category_totals: totals,
            balance: self.balance(),
            currency: self.settings.currency.clone(),
        }
    }

    pub fn report(&self, period: Period, reference: NaiveDate) -> Report<'_> {
        build_report(&self.transactions, period, reference)
    }
}

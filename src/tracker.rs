//! A ledger bound to its store: every mutation is followed by a snapshot write.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;

use crate::currency::CurrencyCode;
use crate::domain::{Settings, Transaction, TransactionId, TransactionInput, UserProfile};
use crate::errors::{LedgerError, Result};
use crate::ledger::{write_csv_export, FilterCriteria, Ledger};
use crate::storage::{
    load_profile, load_settings, load_transactions, save_json, KeyValueStore, PROFILE_KEY,
    SETTINGS_KEY, TRANSACTIONS_KEY,
};
use crate::time::{Clock, SystemClock};

pub struct BudgetTracker<S: KeyValueStore> {
    ledger: Ledger,
    store: S,
    clock: Arc<dyn Clock>,
    default_currency: CurrencyCode,
}

impl<S: KeyValueStore> BudgetTracker<S> {
    /// Rehydrates the ledger from `store`. Corrupt values are replaced by defaults.
    pub fn open(store: S, clock: Arc<dyn Clock>, default_currency: CurrencyCode) -> Self {
        let ledger = Self::load_ledger(&store, &default_currency);
        tracing::info!(
            transactions = ledger.len(),
            currency = %ledger.currency(),
            "ledger loaded"
        );
        Self {
            ledger,
            store,
            clock,
            default_currency,
        }
    }

    pub fn with_system_clock(store: S) -> Self {
        Self::open(store, Arc::new(SystemClock), CurrencyCode::default())
    }

    fn load_ledger(store: &S, default_currency: &CurrencyCode) -> Ledger {
        Ledger::from_parts(
            load_transactions(store),
            load_settings(store, default_currency),
        )
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Discards in-memory state and reads the store again.
    pub fn reload(&mut self) {
        self.ledger = Self::load_ledger(&self.store, &self.default_currency);
    }

    pub fn save(&self) -> Result<()> {
        save_json(&self.store, TRANSACTIONS_KEY, self.ledger.transactions())?;
        save_json(&self.store, SETTINGS_KEY, self.ledger.settings())?;
        Ok(())
    }

    pub fn add_transaction(&mut self, input: TransactionInput) -> Result<Transaction> {
        let today = self.today();
        let previous = self.ledger.clone();
        let created = self.ledger.create(input, today)?.clone();
        self.commit(previous)?;
        tracing::info!(id = %created.id(), kind = %created.kind(), "transaction added");
        Ok(created)
    }

    pub fn delete(&mut self, id: &TransactionId) -> Result<bool> {
        let previous = self.ledger.clone();
        let removed = self.ledger.delete(id);
        if removed {
            self.commit(previous)?;
            tracing::info!(%id, "transaction deleted");
        }
        Ok(removed)
    }

    pub fn delete_many(&mut self, ids: &[TransactionId]) -> Result<usize> {
        let previous = self.ledger.clone();
        let removed = self.ledger.delete_many(ids);
        if removed > 0 {
            self.commit(previous)?;
            tracing::info!(removed, "transactions deleted");
        }
        Ok(removed)
    }

    pub fn set_currency(&mut self, code: &str) -> Result<()> {
        let previous = self.ledger.clone();
        self.ledger.set_currency(code)?;
        self.commit(previous)
    }

    pub fn set_starting_balance(&mut self, balance: f64) -> Result<()> {
        let previous = self.ledger.clone();
        self.ledger.set_starting_balance(balance);
        self.commit(previous)
    }

    /// Saves the mutated ledger, restoring `previous` in memory if the write fails.
    fn commit(&mut self, previous: Ledger) -> Result<()> {
        if let Err(err) = self.save() {
            tracing::warn!(error = %err, "snapshot write failed, rolling back in-memory change");
            self.ledger = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Wipes every stored key and starts over with default settings.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        self.ledger = Ledger::from_parts(
            Vec::new(),
            Settings::with_currency(self.default_currency.clone()),
        );
        save_json(&self.store, SETTINGS_KEY, self.ledger.settings())?;
        tracing::info!("tracker reset");
        Ok(())
    }

    /// Writes the filtered view, newest first by date, as a CSV file in `dir`.
    pub fn export_csv(&self, criteria: &FilterCriteria, dir: &Path) -> Result<PathBuf> {
        let mut view = self.ledger.filter(criteria);
        crate::ledger::sort_newest_first(&mut view);
        write_csv_export(&view, dir, self.today())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        load_profile(&self.store)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        save_json(&self.store, PROFILE_KEY, profile)
    }

    pub fn export_profile(&self, path: &Path) -> Result<()> {
        let profile = self
            .profile()
            .ok_or_else(|| LedgerError::InvalidInput("No data to export".into()))?;
        fs::write(path, serde_json::to_string_pretty(&profile)?)?;
        Ok(())
    }

    /// Replaces the stored profile with the one in `path`; the file must parse.
    pub fn import_profile(&self, path: &Path) -> Result<UserProfile> {
        let data = fs::read_to_string(path)?;
        let profile: UserProfile = serde_json::from_str(&data)?;
        self.save_profile(&profile)?;
        Ok(profile)
    }
}

//! Key-value persistence for the ledger snapshot, settings and profile.

pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::currency::CurrencyCode;
use crate::domain::{Settings, Transaction, UserProfile};
use crate::errors::Result;

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const SETTINGS_KEY: &str = "settings";
pub const PROFILE_KEY: &str = "userProfile";

/// String-keyed store holding one JSON document per key.
///
/// Writes replace the whole value; there is no merge or conflict detection,
/// so concurrent writers on the same backing store resolve as last-write-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Removes every key.
    fn clear(&self) -> Result<()>;
}

/// Reads and decodes `key`. Missing, unreadable and malformed values all
/// yield `None`; the latter two are logged.
pub fn load_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored value");
            return None;
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read stored value, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored value is corrupt, using defaults");
            None
        }
    }
}

pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Stored transactions, skipping records that fail to parse or break the
/// creation rules. An unreadable list as a whole yields an empty ledger.
pub fn load_transactions<S: KeyValueStore + ?Sized>(store: &S) -> Vec<Transaction> {
    let records: Vec<serde_json::Value> =
        load_json(store, TRANSACTIONS_KEY).unwrap_or_default();
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Transaction>(record) {
            Ok(txn) if txn.is_well_formed() => Some(txn),
            Ok(txn) => {
                tracing::warn!(index, id = %txn.id(), "dropping stored transaction with invalid name or amount");
                None
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "dropping unreadable stored transaction");
                None
            }
        })
        .collect()
}

/// Stored settings, or defaults using `default_currency` when none are stored.
pub fn load_settings<S: KeyValueStore + ?Sized>(
    store: &S,
    default_currency: &CurrencyCode,
) -> Settings {
    load_json(store, SETTINGS_KEY)
        .unwrap_or_else(|| Settings::with_currency(default_currency.clone()))
}

pub fn load_profile<S: KeyValueStore + ?Sized>(store: &S) -> Option<UserProfile> {
    load_json(store, PROFILE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_transactions_fall_back_to_empty() {
        let store = MemoryStore::new();
        store.set(TRANSACTIONS_KEY, "{not json").unwrap();
        assert!(load_transactions(&store).is_empty());
    }

    #[test]
    fn unexpected_shape_falls_back_to_defaults() {
        let store = MemoryStore::new();
        store.set(TRANSACTIONS_KEY, r#"{"id":"x"}"#).unwrap();
        store.set(SETTINGS_KEY, "[1,2,3]").unwrap();
        assert!(load_transactions(&store).is_empty());
        let settings = load_settings(&store, &CurrencyCode::new("EUR"));
        assert_eq!(settings.currency.as_str(), "EUR");
    }

    #[test]
    fn invalid_records_are_skipped_individually() {
        let store = MemoryStore::new();
        store
            .set(
                TRANSACTIONS_KEY,
                r#"[
                    {"id":"a","name":"Rent","amount":900,"type":"expense","category":"rent","date":"2024-03-01"},
                    {"id":"b","name":"Refund","amount":-20,"type":"income","category":"other","date":"2024-03-02"},
                    {"id":"c","name":"Free","amount":0,"type":"expense","category":"food","date":"2024-03-03"},
                    {"id":"d","name":"  ","amount":5,"type":"expense","category":"food","date":"2024-03-04"},
                    {"id":"e","name":"Odd","amount":"12","type":"expense","category":"food","date":"2024-03-05"},
                    {"id":"f","name":"Snack","amount":4.5,"type":"expense","category":null,"date":"2024-03-06"}
                ]"#,
            )
            .unwrap();
        let loaded = load_transactions(&store);
        let ids: Vec<_> = loaded.iter().map(|txn| txn.id().as_str()).collect();
        assert_eq!(ids, ["a", "f"]);
        assert_eq!(loaded[1].category(), crate::domain::Category::Other);
    }

    #[test]
    fn settings_without_currency_use_default_code() {
        let store = MemoryStore::new();
        store.set(SETTINGS_KEY, r#"{"balance":25}"#).unwrap();
        let settings = load_settings(&store, &CurrencyCode::new("USD"));
        assert_eq!(settings.currency.as_str(), "PKR");
        assert_eq!(settings.balance, 25.0);
    }

    #[test]
    fn profile_round_trips_through_store() {
        let store = MemoryStore::new();
        assert!(load_profile(&store).is_none());
        let profile = UserProfile {
            full_name: "Sam Lee".into(),
            ..UserProfile::default()
        };
        save_json(&store, PROFILE_KEY, &profile).unwrap();
        assert_eq!(load_profile(&store), Some(profile));
    }
}

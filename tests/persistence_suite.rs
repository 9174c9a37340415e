use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use spendora_core::currency::CurrencyCode;
use spendora_core::domain::{Category, TransactionInput, UserProfile};
use spendora_core::storage::{JsonFileStore, KeyValueStore, TRANSACTIONS_KEY};
use spendora_core::time::FixedClock;
use spendora_core::BudgetTracker;
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
}

fn open(root: &std::path::Path) -> BudgetTracker<JsonFileStore> {
    let store = JsonFileStore::new(root).expect("create store");
    BudgetTracker::open(store, clock(), CurrencyCode::default())
}

#[test]
fn tracker_rehydrates_from_disk() {
    let temp = tempdir().unwrap();
    {
        let mut tracker = open(temp.path());
        tracker
            .add_transaction(TransactionInput::expense("Rent", 900.0, Category::Rent))
            .unwrap();
        tracker.set_currency("GBP").unwrap();
    }

    let tracker = open(temp.path());
    assert_eq!(tracker.ledger().len(), 1);
    assert_eq!(tracker.ledger().transactions()[0].name(), "Rent");
    assert_eq!(tracker.ledger().currency().as_str(), "GBP");
    assert_eq!(tracker.ledger().format_amount(900.0), "£ 900");
}

#[test]
fn corrupt_transactions_fall_back_to_empty() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::new(temp.path()).unwrap();
    store.set(TRANSACTIONS_KEY, "{not json").unwrap();

    let tracker = BudgetTracker::open(store, clock(), CurrencyCode::default());
    assert!(tracker.ledger().is_empty());
    assert_eq!(tracker.ledger().currency().as_str(), "PKR");
}

#[test]
fn legacy_records_with_unknown_category_load_as_other() {
    let temp = tempdir().unwrap();
    let store = JsonFileStore::new(temp.path()).unwrap();
    store
        .set(
            TRANSACTIONS_KEY,
            r#"[{"id":"1700000000000","name":"Gym","amount":30,"type":"expense","category":"fitness","date":"2024-01-05"}]"#,
        )
        .unwrap();

    let tracker = BudgetTracker::open(store, clock(), CurrencyCode::default());
    let txn = &tracker.ledger().transactions()[0];
    assert_eq!(txn.id().as_str(), "1700000000000");
    assert_eq!(txn.category(), Category::Other);
}

#[test]
fn reset_wipes_store_and_writes_default_settings() {
    let temp = tempdir().unwrap();
    let mut tracker = open(temp.path());
    tracker
        .add_transaction(TransactionInput::income("Pay", 10.0))
        .unwrap();
    tracker
        .save_profile(&UserProfile {
            full_name: "Test User".into(),
            ..UserProfile::default()
        })
        .unwrap();

    tracker.reset().unwrap();

    assert!(tracker.profile().is_none());
    assert!(!temp.path().join("transactions.json").exists());
    let settings = fs::read_to_string(temp.path().join("settings.json")).unwrap();
    assert_eq!(settings, r#"{"currency":"PKR"}"#);
}

#[test]
fn failed_write_leaves_previous_snapshot() {
    let temp = tempdir().unwrap();
    let mut tracker = open(temp.path());
    tracker
        .add_transaction(TransactionInput::income("Pay", 10.0))
        .unwrap();
    let path = temp.path().join("transactions.json");
    let original = fs::read_to_string(&path).unwrap();

    // A directory where the temp file should go makes the write fail.
    fs::create_dir_all(temp.path().join("transactions.json.tmp")).unwrap();
    let result = tracker.add_transaction(TransactionInput::income("Bonus", 5.0));
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(tracker.ledger().len(), 1);
    assert_eq!(tracker.ledger().transactions()[0].name(), "Pay");

    // The next successful write must not resurrect the rejected record.
    fs::remove_dir(temp.path().join("transactions.json.tmp")).unwrap();
    tracker.set_currency("USD").unwrap();
    let stored = fs::read_to_string(&path).unwrap();
    assert!(stored.contains("\"Pay\""));
    assert!(!stored.contains("Bonus"));
}

#[test]
fn null_category_does_not_discard_other_records() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("transactions.json"),
        r#"[
            {"id":"r1","name":"Rent","amount":900,"type":"expense","category":"rent","date":"2024-05-01"},
            {"id":"m1","name":"Market","amount":35,"type":"expense","category":null,"date":"2024-05-02"}
        ]"#,
    )
    .unwrap();

    let mut tracker = open(temp.path());
    assert_eq!(tracker.ledger().len(), 2);
    let market = tracker
        .ledger()
        .transactions()
        .iter()
        .find(|txn| txn.name() == "Market")
        .unwrap();
    assert_eq!(market.category(), Category::Other);

    tracker
        .add_transaction(TransactionInput::income("Pay", 1000.0))
        .unwrap();
    let stored = fs::read_to_string(temp.path().join("transactions.json")).unwrap();
    assert!(stored.contains("\"Rent\""));
    assert!(stored.contains("\"Market\""));
}

#[test]
fn invalid_stored_records_are_dropped_on_load() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("transactions.json"),
        r#"[
            {"id":"ok","name":"Salary","amount":1200,"type":"income","category":"other","date":"2024-05-01"},
            {"id":"neg","name":"Refund","amount":-40,"type":"expense","category":"food","date":"2024-05-02"},
            {"id":"zero","name":"Nothing","amount":0,"type":"income","category":"other","date":"2024-05-03"},
            {"id":"blank","name":"","amount":15,"type":"expense","category":"food","date":"2024-05-04"}
        ]"#,
    )
    .unwrap();

    let mut tracker = open(temp.path());
    assert_eq!(tracker.ledger().len(), 1);
    assert_eq!(tracker.ledger().balance(), 1200.0);

    tracker.set_starting_balance(10.0).unwrap();
    let stored = fs::read_to_string(temp.path().join("transactions.json")).unwrap();
    assert!(stored.contains("\"Salary\""));
    assert!(!stored.contains("Refund"));
    assert!(!stored.contains("Nothing"));
}

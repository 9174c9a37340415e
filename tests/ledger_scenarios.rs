use std::collections::HashSet;

use chrono::NaiveDate;
use spendora_core::domain::{Category, Transaction, TransactionInput, TransactionType};
use spendora_core::ledger::{
    category_totals, compute_balance, filter, insights, period_window, FilterCriteria, Ledger,
    Period,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_ledger() -> Ledger {
    let today = date(2024, 3, 15);
    let mut ledger = Ledger::new();
    let inputs = [
        TransactionInput::income("Salary", 100.0).on(date(2024, 3, 1)),
        TransactionInput::expense("Groceries", 40.0, Category::Food).on(date(2024, 3, 2)),
        TransactionInput::expense("Cinema", 15.0, Category::Entertainment).on(date(2024, 2, 20)),
        TransactionInput::expense("Bus", 5.0, Category::Transport).on(date(2023, 12, 31)),
    ];
    for input in inputs {
        ledger.create(input, today).expect("valid input");
    }
    ledger
}

#[test]
fn created_ids_are_unique() {
    let ledger = seeded_ledger();
    let ids: HashSet<_> = ledger.transactions().iter().map(|txn| txn.id().clone()).collect();
    assert_eq!(ids.len(), ledger.len());
}

#[test]
fn newest_record_is_first() {
    let ledger = seeded_ledger();
    assert_eq!(ledger.transactions()[0].name(), "Bus");
    assert_eq!(ledger.transactions()[3].name(), "Salary");
}

#[test]
fn balance_is_additive_over_disjoint_sets() {
    let ledger = seeded_ledger();
    let (left, right) = ledger.transactions().split_at(2);
    let whole = compute_balance(ledger.transactions(), 0.0);
    assert_eq!(whole, compute_balance(left, 0.0) + compute_balance(right, 0.0));
    assert_eq!(whole, 40.0);
}

#[test]
fn income_and_food_expense_scenario() {
    let today = date(2024, 1, 1);
    let txns = vec![
        Transaction::create(TransactionInput::income("Pay", 100.0), today).unwrap(),
        Transaction::create(TransactionInput::expense("Food", 40.0, Category::Food), today)
            .unwrap(),
    ];
    assert_eq!(compute_balance(&txns, 0.0), 60.0);

    let totals = category_totals(&txns);
    assert_eq!(totals.len(), 6);
    assert_eq!(totals.get(Category::Food), 40.0);
    for category in [
        Category::Rent,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Other,
    ] {
        assert_eq!(totals.get(category), 0.0);
    }
}

#[test]
fn empty_name_is_rejected_without_adding() {
    let mut ledger = Ledger::new();
    let input = TransactionInput::new("", 50.0, TransactionType::Expense).on(date(2024, 1, 1));
    let errors = ledger.create(input, date(2024, 1, 1)).unwrap_err();
    assert!(errors.contains("Name is required"));
    assert!(ledger.is_empty());
}

#[test]
fn filter_is_idempotent_and_non_destructive() {
    let ledger = seeded_ledger();
    let before = ledger.clone();
    let criteria = FilterCriteria::all().kind(TransactionType::Expense).year(2024);

    let once = filter(ledger.transactions(), &criteria);
    let twice = filter(once.iter().copied(), &criteria);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
    assert_eq!(ledger, before);
}

#[test]
fn last_month_window_for_leap_year() {
    let window = period_window(&Period::LastMonth, date(2024, 3, 15));
    assert_eq!(window.start, date(2024, 2, 1));
    assert_eq!(window.end, date(2024, 2, 29));
}

#[test]
fn insights_follow_the_priority_chain() {
    let today = date(2024, 1, 1);
    let income = Transaction::create(TransactionInput::income("Pay", 100.0), today).unwrap();
    let fun = |amount| {
        Transaction::create(
            TransactionInput::expense("Fun", amount, Category::Entertainment),
            today,
        )
        .unwrap()
    };

    let lunch = Transaction::create(
        TransactionInput::expense("Lunch", 5.0, Category::Food),
        today,
    )
    .unwrap();

    let balanced = [income.clone(), fun(80.0)];
    let titles: Vec<_> = insights(&balanced).iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["Balanced Budget"]);

    let overspent = [income.clone(), fun(120.0), lunch.clone()];
    let titles: Vec<_> = insights(&overspent).iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["Overspending Alert", "High Entertainment Cost"]);

    let saver = [income.clone(), fun(20.0)];
    let titles: Vec<_> = insights(&saver).iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["Great Saver"]);

    let saver_with_food = [income, fun(20.0), lunch];
    let titles: Vec<_> = insights(&saver_with_food).iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["Great Saver", "High Entertainment Cost"]);
}

#[test]
fn report_scopes_to_the_requested_period() {
    let ledger = seeded_ledger();
    let report = ledger.report(Period::CurrentMonth, date(2024, 3, 15));
    assert_eq!(report.transactions.len(), 2);
    assert_eq!(report.totals.income, 100.0);
    assert_eq!(report.totals.expense, 40.0);
    assert_eq!(report.performance.savings_rate, 60);
}

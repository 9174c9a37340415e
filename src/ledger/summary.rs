//! Aggregates derived from a transaction view: balance, totals, chart series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Category, Transaction, TransactionType};

pub const EMPTY_CHART_LABEL: &str = "No Expenses Yet";
pub const EMPTY_CHART_COLOR: &str = "#e0e0e0";

/// Signed sum of the view on top of `starting_balance`.
pub fn compute_balance<'a, I>(transactions: I, starting_balance: f64) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(starting_balance, |acc, txn| acc + txn.signed_amount())
}

/// Expense totals keyed by category. Every known category is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<Category, f64>);

impl CategoryTotals {
    pub fn zeroed() -> Self {
        Self(Category::ALL.iter().map(|category| (*category, 0.0)).collect())
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or_default()
    }

    /// Pairs in legend order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL
            .iter()
            .map(move |category| (*category, self.get(*category)))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0.0
    }

    fn add(&mut self, category: Category, amount: f64) {
        *self.0.entry(category).or_insert(0.0) += amount;
    }
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::zeroed()
    }
}

pub fn category_totals<'a, I>(transactions: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = CategoryTotals::zeroed();
    for txn in transactions.into_iter().filter(|txn| txn.is_expense()) {
        totals.add(txn.category(), txn.amount());
    }
    totals
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub count: usize,
}

impl Totals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    /// Unsigned sum of every amount.
    pub fn volume(&self) -> f64 {
        self.income + self.expense
    }
}

pub fn totals<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(Totals::default(), |mut acc, txn| {
            match txn.kind() {
                TransactionType::Income => acc.income += txn.amount(),
                TransactionType::Expense => acc.expense += txn.amount(),
            }
            acc.count += 1;
            acc
        })
}

/// `round(part / total * 100)`, or 0 when `total` is zero.
pub fn percentage(part: f64, total: f64) -> i64 {
    if total == 0.0 {
        return 0;
    }
    ((part / total) * 100.0).round() as i64
}

/// Chart-ready series. Rendering is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub total: f64,
    /// Set when there is no expense to plot; the series then holds a single placeholder slice.
    pub empty: bool,
}

pub fn chart_data(totals: &CategoryTotals) -> ChartData {
    let total = totals.total();
    if total == 0.0 {
        return ChartData {
            labels: vec![EMPTY_CHART_LABEL.to_string()],
            values: vec![1.0],
            colors: vec![EMPTY_CHART_COLOR.to_string()],
            total,
            empty: true,
        };
    }
    let mut chart = ChartData {
        labels: Vec::with_capacity(totals.len()),
        values: Vec::with_capacity(totals.len()),
        colors: Vec::with_capacity(totals.len()),
        total,
        empty: false,
    };
    for (category, amount) in totals.iter() {
        let info = category.info();
        chart.labels.push(info.name.to_string());
        chart.values.push(amount);
        chart.colors.push(info.color.to_string());
    }
    chart
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryStats {
    /// Categories with a non-zero expense total.
    pub active: usize,
    pub highest: Option<(Category, f64)>,
    /// Share of the highest category in total expenses, in percent.
    pub highest_share: i64,
    pub average: f64,
    pub total: f64,
}

pub fn category_stats(totals: &CategoryTotals) -> CategoryStats {
    let total = totals.total();
    let mut highest: Option<(Category, f64)> = None;
    for (category, amount) in totals.iter() {
        if amount > highest.map_or(0.0, |(_, best)| best) {
            highest = Some((category, amount));
        }
    }
    CategoryStats {
        active: totals.iter().filter(|(_, amount)| *amount > 0.0).count(),
        highest,
        highest_share: percentage(highest.map_or(0.0, |(_, amount)| amount), total),
        average: total / Category::ALL.len() as f64,
        total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetPerformance {
    /// Share of income spent, capped at 100.
    pub percent_used: i64,
    pub savings_rate: i64,
}

pub fn budget_performance(totals: &Totals) -> BudgetPerformance {
    let limit = if totals.income > 0.0 { totals.income } else { 1.0 };
    BudgetPerformance {
        percent_used: percentage(totals.expense, limit).min(100),
        savings_rate: if totals.income > 0.0 {
            percentage(totals.net(), totals.income)
        } else {
            0
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

impl TrendPoint {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Per-day income and expense, ordered by date.
pub fn trend_series<'a, I>(transactions: I) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut grouped: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();
    for txn in transactions {
        let point = grouped.entry(txn.date()).or_insert(TrendPoint {
            date: txn.date(),
            income: 0.0,
            expense: 0.0,
        });
        match txn.kind() {
            TransactionType::Income => point.income += txn.amount(),
            TransactionType::Expense => point.expense += txn.amount(),
        }
    }
    grouped.into_values().collect()
}

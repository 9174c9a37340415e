use chrono::NaiveDate;

use crate::domain::Transaction;
use crate::ledger::filter::in_window;
use crate::ledger::insights::{insights, Insight};
use crate::ledger::period::{DateWindow, Period};
use crate::ledger::summary::{
    budget_performance, category_stats, category_totals, totals, trend_series,
    BudgetPerformance, CategoryStats, CategoryTotals, Totals, TrendPoint,
};

/// Everything the reports screen shows for one period.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub period: Period,
    pub window: DateWindow,
    pub transactions: Vec<&'a Transaction>,
    pub totals: Totals,
    pub category_totals: CategoryTotals,
    pub stats: CategoryStats,
    pub performance: BudgetPerformance,
    pub insights: Vec<Insight>,
    pub trend: Vec<TrendPoint>,
}

pub fn build_report<'a, I>(transactions: I, period: Period, reference: NaiveDate) -> Report<'a>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let window = period.window(reference);
    let view = in_window(transactions, window);
    let totals = totals(view.iter().copied());
    let by_category = category_totals(view.iter().copied());
    Report {
        period,
        window,
        totals,
        stats: category_stats(&by_category),
        category_totals: by_category,
        performance: budget_performance(&totals),
        insights: insights(view.iter().copied()),
        trend: trend_series(view.iter().copied()),
        transactions: view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, TransactionInput};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn report_only_covers_the_period() {
        let reference = date(2024, 3, 15);
        let txns: Vec<Transaction> = [
            TransactionInput::income("Feb pay", 1000.0).on(date(2024, 2, 1)),
            TransactionInput::expense("Feb rent", 400.0, Category::Rent).on(date(2024, 2, 3)),
            TransactionInput::expense("Mar food", 50.0, Category::Food).on(date(2024, 3, 2)),
        ]
        .into_iter()
        .map(|input| Transaction::create(input, reference).unwrap())
        .collect();

        let report = build_report(&txns, Period::LastMonth, reference);
        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.totals.income, 1000.0);
        assert_eq!(report.category_totals.get(Category::Food), 0.0);
        assert_eq!(report.stats.highest, Some((Category::Rent, 400.0)));
        assert_eq!(report.performance.percent_used, 40);
        assert_eq!(report.insights[0].title, "Great Saver");
        assert_eq!(report.trend.len(), 2);
        assert_eq!(report.period.label(), "LAST MONTH");
    }
}

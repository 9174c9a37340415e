//! Rule-based observations about spending in a view.

use std::fmt;

use serde::Serialize;

use crate::domain::{Category, Transaction};
use crate::ledger::summary::{category_totals, totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Info,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

pub const OVERSPENDING: Insight = Insight {
    title: "Overspending Alert",
    description: "You have spent more than you earned this period.",
    severity: Severity::Danger,
};

pub const GREAT_SAVER: Insight = Insight {
    title: "Great Saver",
    description: "You saved more than 50% of your income!",
    severity: Severity::Success,
};

pub const BALANCED: Insight = Insight {
    title: "Balanced Budget",
    description: "Your spending is within sustainable limits.",
    severity: Severity::Info,
};

pub const HIGH_ENTERTAINMENT: Insight = Insight {
    title: "High Entertainment Cost",
    description: "You spent more on fun than food. Check your priorities?",
    severity: Severity::Warning,
};

/// Exactly one of the spending rules fires, followed by the optional
/// entertainment rule. That rule only compares against food when at least
/// one food expense exists; without food spending there is nothing to outweigh.
pub fn insights<'a, I>(transactions: I) -> Vec<Insight>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let view: Vec<&Transaction> = transactions.into_iter().collect();
    let totals = totals(view.iter().copied());
    let by_category = category_totals(view.iter().copied());

    let mut found = Vec::with_capacity(2);
    if totals.expense > totals.income {
        found.push(OVERSPENDING);
    } else if totals.expense < totals.income * 0.5 {
        found.push(GREAT_SAVER);
    } else {
        found.push(BALANCED);
    }

    let has_food = view
        .iter()
        .any(|txn| txn.is_expense() && txn.category() == Category::Food);
    if has_food && by_category.get(Category::Entertainment) > by_category.get(Category::Food) {
        found.push(HIGH_ENTERTAINMENT);
    }
    found
}

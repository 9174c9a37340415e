//! Non-destructive views over the transaction collection.

use chrono::Datelike;

use crate::domain::{Category, Transaction, TransactionType};
use crate::errors::{LedgerError, Result};
use crate::ledger::period::DateWindow;

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Conjunctive filter. `None` in any field means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub category: Option<Category>,
    pub kind: Option<TransactionType>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub window: Option<DateWindow>,
}

impl FilterCriteria {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self == &Self::default()
    }

    /// Applies a single `key=value` style setting; `all` clears the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let clear = value.eq_ignore_ascii_case("all");
        match key.trim().to_ascii_lowercase().as_str() {
            "category" => {
                self.category = if clear {
                    None
                } else {
                    Some(Category::lookup(value).ok_or_else(|| {
                        LedgerError::InvalidInput(format!("unknown category `{}`", value))
                    })?)
                };
            }
            "type" => {
                self.kind = if clear { None } else { Some(value.parse()?) };
            }
            "month" => {
                self.month = if clear { None } else { Some(parse_month(value)?) };
            }
            "year" => {
                self.year = if clear {
                    None
                } else {
                    Some(value.parse().map_err(|_| {
                        LedgerError::InvalidInput(format!("invalid year `{}`", value))
                    })?)
                };
            }
            other => {
                return Err(LedgerError::InvalidInput(format!(
                    "unknown filter `{}` (expected category, type, month or year)",
                    other
                )))
            }
        }
        Ok(())
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        let date = txn.date();
        self.category.map_or(true, |category| txn.category() == category)
            && self.kind.map_or(true, |kind| txn.kind() == kind)
            && self.month.map_or(true, |month| date.month() == month)
            && self.year.map_or(true, |year| date.year() == year)
            && self.window.map_or(true, |window| window.contains(date))
    }
}

fn parse_month(value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(LedgerError::InvalidInput(format!(
            "invalid month `{}` (expected 1-12)",
            value
        ))),
    }
}

/// Returns the records matching `criteria`, preserving source order.
pub fn filter<'a, I>(transactions: I, criteria: &FilterCriteria) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|txn| criteria.matches(txn))
        .collect()
}

/// Records dated inside `window`.
pub fn in_window<'a, I>(transactions: I, window: DateWindow) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    filter(transactions, &FilterCriteria::all().within(window))
}

/// Stable sort by date, newest first.
pub fn sort_newest_first(view: &mut [&Transaction]) {
    view.sort_by_key(|txn| std::cmp::Reverse(txn.date()));
}

/// One page of a view. Pages are 1-based and there is always at least one.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub items: Vec<&'a Transaction>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Page<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slices `view` into pages of `per_page`, clamping `page` into range.
pub fn paginate<'a>(view: &[&'a Transaction], page: usize, per_page: usize) -> Page<'a> {
    let per_page = per_page.max(1);
    let total_pages = view.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let items = view
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .copied()
        .collect();
    Page {
        items,
        page,
        total_pages,
        total_items: view.len(),
    }
}

/// Distinct years present in the collection, newest first.
pub fn years_present<'a, I>(transactions: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut years: Vec<i32> = transactions.into_iter().map(|txn| txn.date().year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

//! Named reporting periods and their concrete date ranges.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(LedgerError::InvalidInput(
                "window end must not be before start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    CurrentMonth,
    LastMonth,
    LastThreeMonths,
    LastSixMonths,
    CurrentYear,
    LastYear,
    Custom(DateWindow),
    /// Everything up to the reference date.
    All,
}

impl Period {
    /// Maps a period token to a period. Unrecognised tokens mean "no filter";
    /// `custom` requires an explicit window.
    pub fn from_token(token: &str, custom: Option<DateWindow>) -> Result<Self> {
        let period = match token.trim().to_ascii_lowercase().as_str() {
            "current-month" => Period::CurrentMonth,
            "last-month" => Period::LastMonth,
            "last-3-months" => Period::LastThreeMonths,
            "last-6-months" => Period::LastSixMonths,
            "current-year" => Period::CurrentYear,
            "last-year" => Period::LastYear,
            "custom" => match custom {
                Some(window) => Period::Custom(window),
                None => {
                    return Err(LedgerError::InvalidInput(
                        "custom period requires a start and end date".into(),
                    ))
                }
            },
            _ => Period::All,
        };
        Ok(period)
    }

    pub fn token(&self) -> &'static str {
        match self {
            Period::CurrentMonth => "current-month",
            Period::LastMonth => "last-month",
            Period::LastThreeMonths => "last-3-months",
            Period::LastSixMonths => "last-6-months",
            Period::CurrentYear => "current-year",
            Period::LastYear => "last-year",
            Period::Custom(_) => "custom",
            Period::All => "all",
        }
    }

    /// Upper-cased token with dashes replaced, e.g. `LAST 3 MONTHS`.
    pub fn label(&self) -> String {
        self.token().replace('-', " ").to_uppercase()
    }

    pub fn window(&self, reference: NaiveDate) -> DateWindow {
        period_window(self, reference)
    }
}

/// Resolves `period` against `reference` into an inclusive date range.
pub fn period_window(period: &Period, reference: NaiveDate) -> DateWindow {
    let month_start = first_of_month(reference.year(), reference.month());
    let (start, end) = match period {
        Period::CurrentMonth => (month_start, last_of_month(month_start)),
        Period::LastMonth => {
            let previous = months_before(month_start, 1);
            (previous, last_of_month(previous))
        }
        Period::LastThreeMonths => (months_before(month_start, 3), reference),
        Period::LastSixMonths => (months_before(month_start, 6), reference),
        Period::CurrentYear => year_bounds(reference.year()),
        Period::LastYear => year_bounds(reference.year() - 1),
        Period::Custom(window) => (window.start, window.end),
        Period::All => (epoch(), reference),
    };
    DateWindow { start, end }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

fn last_of_month(month_start: NaiveDate) -> NaiveDate {
    month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(month_start)
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(start);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window_for(token: &str, reference: NaiveDate) -> DateWindow {
        Period::from_token(token, None).unwrap().window(reference)
    }

    #[test]
    fn last_month_covers_leap_february() {
        let window = window_for("last-month", date(2024, 3, 15));
        assert_eq!(window, DateWindow { start: date(2024, 2, 1), end: date(2024, 2, 29) });
    }

    #[test]
    fn current_month_runs_to_last_day() {
        let window = window_for("current-month", date(2023, 4, 10));
        assert_eq!(window.start, date(2023, 4, 1));
        assert_eq!(window.end, date(2023, 4, 30));
    }

    #[test]
    fn rolling_windows_cross_year_boundaries() {
        let reference = date(2024, 2, 20);
        let three = window_for("last-3-months", reference);
        assert_eq!(three.start, date(2023, 11, 1));
        assert_eq!(three.end, reference);
        let six = window_for("last-6-months", reference);
        assert_eq!(six.start, date(2023, 8, 1));
    }

    #[test]
    fn last_month_in_january_is_previous_december() {
        let window = window_for("last-month", date(2024, 1, 9));
        assert_eq!(window.start, date(2023, 12, 1));
        assert_eq!(window.end, date(2023, 12, 31));
    }

    #[test]
    fn year_tokens_span_full_calendar_years() {
        let reference = date(2024, 6, 1);
        assert_eq!(
            window_for("current-year", reference),
            DateWindow { start: date(2024, 1, 1), end: date(2024, 12, 31) }
        );
        assert_eq!(
            window_for("last-year", reference),
            DateWindow { start: date(2023, 1, 1), end: date(2023, 12, 31) }
        );
    }

    #[test]
    fn unrecognised_token_is_unfiltered() {
        let reference = date(2024, 6, 1);
        let window = window_for("fortnight", reference);
        assert_eq!(window.start, date(1970, 1, 1));
        assert_eq!(window.end, reference);
    }

    #[test]
    fn custom_uses_supplied_window() {
        let custom = DateWindow::new(date(2024, 1, 5), date(2024, 1, 20)).unwrap();
        let period = Period::from_token("custom", Some(custom)).unwrap();
        assert_eq!(period.window(date(2030, 1, 1)), custom);
        assert!(Period::from_token("custom", None).is_err());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 1, 31)));
        assert!(!window.contains(date(2024, 2, 1)));
        assert!(DateWindow::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn labels_replace_dashes() {
        assert_eq!(Period::LastThreeMonths.label(), "LAST 3 MONTHS");
    }
}

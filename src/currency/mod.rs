//! Currency codes and display formatting.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Codes the settings screen offers, paired with the symbol used for display.
pub const SUPPORTED_CURRENCIES: &[(&str, &str)] = &[
    ("PKR", "Rs"),
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CAD", "C$"),
    ("AUD", "A$"),
    ("INR", "₹"),
    ("CNY", "¥"),
    ("ZAR", "R"),
    ("NGN", "₦"),
];

pub const DEFAULT_CURRENCY: &str = "PKR";

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_supported(code: &CurrencyCode) -> bool {
    symbol_for(code.as_str()).is_some()
}

pub fn symbol_for(code: &str) -> Option<&'static str> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, symbol)| *symbol)
}

/// Formats `amount` with zero fraction digits, e.g. `Rs 1,500` or `$ -60`.
///
/// Unknown codes render with the upper-cased code in place of a symbol.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let body = format_number(amount);
    match symbol_for(currency) {
        Some(symbol) => format!("{} {}", symbol, body),
        None => format!("{} {}", currency.trim().to_uppercase(), body),
    }
}

/// Rounds half away from zero and groups thousands with commas.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".into();
    }
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_digits(&digits, ',');
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Day, short month and year, e.g. `5 Mar 2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_label(date.month()), date.year())
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

//! CSV export of a transaction view.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::domain::Transaction;
use crate::errors::{LedgerError, Result};

pub const CSV_HEADER: &str = "Date,Name,Category,Type,Amount";
pub const CSV_MIME_TYPE: &str = "text/csv";
const EXPORT_PREFIX: &str = "spendora_export_";

/// Renders the header plus one line per record.
///
/// The name column is wrapped in double quotes so embedded commas survive;
/// quote characters inside names are written as-is.
pub fn to_csv<'a, I>(transactions: I) -> String
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for txn in transactions {
        out.push_str(&format!(
            "{},\"{}\",{},{},{}\n",
            txn.date().format("%Y-%m-%d"),
            txn.name(),
            txn.category(),
            txn.kind(),
            txn.amount()
        ));
    }
    out
}

/// `spendora_export_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}{}.csv", EXPORT_PREFIX, date.format("%Y-%m-%d"))
}

/// Writes the view into `dir` under the dated export name and returns the path.
pub fn write_csv_export(view: &[&Transaction], dir: &Path, today: NaiveDate) -> Result<PathBuf> {
    if view.is_empty() {
        return Err(LedgerError::InvalidInput(
            "No transactions to export.".into(),
        ));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(today));
    fs::write(&path, to_csv(view.iter().copied()))?;
    tracing::info!(path = %path.display(), rows = view.len(), "exported transactions");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, TransactionInput};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn header_only_for_empty_view() {
        assert_eq!(to_csv(std::iter::empty::<&Transaction>()), "Date,Name,Category,Type,Amount\n");
    }

    #[test]
    fn rows_quote_name_and_keep_integer_amounts_plain() {
        let txn = Transaction::create(
            TransactionInput::expense("Rent, March", 1500.0, Category::Rent).on(date(2024, 3, 1)),
            date(2024, 3, 1),
        )
        .unwrap();
        let csv = to_csv([&txn]);
        assert_eq!(
            csv.lines().nth(1),
            Some("2024-03-01,\"Rent, March\",rent,expense,1500")
        );
    }

    #[test]
    fn file_name_carries_iso_date() {
        assert_eq!(export_file_name(date(2024, 7, 9)), "spendora_export_2024-07-09.csv");
    }

    #[test]
    fn refuses_to_write_an_empty_export() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_csv_export(&[], dir.path(), date(2024, 1, 1)).unwrap_err();
        assert!(err.to_string().contains("No transactions to export."));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}

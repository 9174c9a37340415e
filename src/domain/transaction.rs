use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::Category;
use crate::errors::{LedgerError, ValidationErrors};

pub const NAME_REQUIRED: &str = "Name is required";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be > 0";
pub const DATE_REQUIRED: &str = "Date is required";

/// Opaque identifier assigned when a transaction is created.
///
/// Persisted collections may carry identifiers minted by other clients, so the
/// value is kept as an arbitrary string rather than a parsed UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Sign applied to the amount when computing a balance.
    pub fn sign(self) -> f64 {
        match self {
            TransactionType::Income => 1.0,
            TransactionType::Expense => -1.0,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" | "expenses" => Ok(TransactionType::Expense),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown transaction type `{}` (expected income or expense)",
                other
            ))),
        }
    }
}

/// Raw values supplied by a form before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub name: String,
    pub amount: Option<f64>,
    pub kind: TransactionType,
    pub category: Category,
    pub date: Option<NaiveDate>,
}

impl TransactionInput {
    pub fn new(name: impl Into<String>, amount: f64, kind: TransactionType) -> Self {
        Self {
            name: name.into(),
            amount: Some(amount),
            kind,
            category: Category::Other,
            date: None,
        }
    }

    pub fn income(name: impl Into<String>, amount: f64) -> Self {
        Self::new(name, amount, TransactionType::Income)
    }

    pub fn expense(name: impl Into<String>, amount: f64, category: Category) -> Self {
        Self::new(name, amount, TransactionType::Expense).with_category(category)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Checks the business rules for a new transaction and returns every violation found.
pub fn validate_input(input: &TransactionInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if input.name.trim().is_empty() {
        errors.push(NAME_REQUIRED);
    }
    match input.amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => {}
        _ => errors.push(AMOUNT_NOT_POSITIVE),
    }
    if input.date.is_none() {
        errors.push(DATE_REQUIRED);
    }
    errors
}

/// A single income or expense record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    name: String,
    amount: f64,
    #[serde(rename = "type")]
    kind: TransactionType,
    #[serde(default)]
    category: Category,
    date: NaiveDate,
}

impl Transaction {
    /// Validates `input`, defaulting a missing date to `today`, and mints a fresh id.
    pub fn create(mut input: TransactionInput, today: NaiveDate) -> Result<Self, ValidationErrors> {
        if input.date.is_none() {
            input.date = Some(today);
        }
        validate_input(&input).into_result()?;
        Ok(Self {
            id: TransactionId::generate(),
            name: input.name.trim().to_string(),
            amount: input.amount.unwrap_or_default(),
            kind: input.kind,
            category: input.category,
            date: input.date.unwrap_or(today),
        })
    }

    /// Whether a record read back from storage still satisfies the creation rules.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && self.amount.is_finite() && self.amount > 0.0
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with the sign implied by the transaction type.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

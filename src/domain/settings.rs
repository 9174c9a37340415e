use serde::{Deserialize, Serialize};

use crate::currency::{is_supported, CurrencyCode};
use crate::errors::{LedgerError, Result};

/// Display preferences persisted next to the transaction collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: CurrencyCode,
    /// Starting balance added to the signed transaction sum.
    #[serde(skip_serializing_if = "is_zero")]
    pub balance: f64,
}

impl Settings {
    pub fn with_currency(currency: CurrencyCode) -> Self {
        Self {
            currency,
            ..Self::default()
        }
    }

    /// Switches the display currency, rejecting codes outside the supported set.
    pub fn set_currency(&mut self, code: &str) -> Result<()> {
        let code = CurrencyCode::new(code.trim());
        if !is_supported(&code) {
            return Err(LedgerError::InvalidInput(format!(
                "unsupported currency `{}`",
                code.as_str()
            )));
        }
        self.currency = code;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            balance: 0.0,
        }
    }
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

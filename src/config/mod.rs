//! User configuration and data-directory layout.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::currency::{CurrencyCode, DEFAULT_CURRENCY};
use crate::errors::{LedgerError, Result};
use crate::ledger::filter::DEFAULT_ROWS_PER_PAGE;

pub const HOME_ENV: &str = "SPENDORA_HOME";
const DEFAULT_DIR_NAME: &str = ".spendora";
const STORE_DIR: &str = "store";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_RECENT_COUNT: usize = 5;

/// Returns the application data directory, defaulting to `~/.spendora`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn store_dir_in(base: &Path) -> PathBuf {
    base.join(STORE_DIR)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rows_per_page: usize,
    pub recent_count: usize,
    /// Currency used until the user picks one.
    pub default_currency: CurrencyCode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            recent_count: DEFAULT_RECENT_COUNT,
            default_currency: CurrencyCode::new(DEFAULT_CURRENCY),
        }
    }
}

/// Loads and saves [`Config`] as `<base>/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        let config_path = base.join(CONFIG_FILE);
        Ok(Self { base, config_path })
    }

    pub fn default_location() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store_dir(&self) -> PathBuf {
        store_dir_in(&self.base)
    }

    /// Missing file yields defaults; a malformed file is an error.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        serde_json::from_str(&data).map_err(|err| {
            LedgerError::Storage(format!(
                "invalid configuration `{}`: {}",
                self.config_path.display(),
                err
            ))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;
        Ok(())
    }
}

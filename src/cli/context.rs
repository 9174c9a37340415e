//! Shell state shared by every command handler.

use std::sync::Arc;

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::config::{Config, ConfigManager};
use crate::ledger::FilterCriteria;
use crate::storage::JsonFileStore;
use crate::time::{Clock, SystemClock};
use crate::tracker::BudgetTracker;

use super::commands;
use super::errors::{CliError, CommandError};
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: BudgetTracker<JsonFileStore>,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Criteria applied by `list` and `export`.
    pub criteria: FilterCriteria,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::default_location()?;
        Self::with_manager(mode, config_manager, Arc::new(SystemClock))
    }

    pub fn with_manager(
        mode: CliMode,
        config_manager: ConfigManager,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let store = JsonFileStore::new(config_manager.store_dir())?;
        let tracker = BudgetTracker::open(store, clock, config.default_currency.clone());
        tracing::debug!(home = %config_manager.base_dir().display(), "shell context ready");

        Ok(Self {
            mode,
            registry,
            tracker,
            config_manager,
            config,
            criteria: FilterCriteria::all(),
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        if self.criteria.is_unfiltered() {
            "spendora> ".to_string()
        } else {
            "spendora (filtered)> ".to_string()
        }
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.tracker.today()
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        self.tracker.ledger().format_amount(amount)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    /// Asks before destructive actions. Scripts run unattended, so they always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        super::shell::handle_line(self, line)
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::time::FixedClock;
    use tempfile::TempDir;

    pub(crate) fn script_context(today: NaiveDate) -> (TempDir, ShellContext) {
        let home = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();
        let context =
            ShellContext::with_manager(CliMode::Script, manager, Arc::new(FixedClock::new(today)))
                .unwrap();
        (home, context)
    }
}

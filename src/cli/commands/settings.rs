use std::path::Path;

use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::errors::CommandError;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;
use crate::currency::{is_supported, symbol_for, CurrencyCode, SUPPORTED_CURRENCIES};
use crate::domain::UserProfile;

const PROFILE_USAGE: &str =
    "profile [show | set <field> <value> | export <file> | import <file>]";
const CONFIG_USAGE: &str = "config [show | set <key> <value>]";
pub(crate) const CONFIG_KEYS: &[&str] = &["rows_per_page", "recent_count", "default_currency"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "currency",
            "Show or change the display currency",
            "currency [code]",
            cmd_currency,
        ),
        CommandEntry::new("profile", "Manage the user profile", PROFILE_USAGE, cmd_profile),
        CommandEntry::new(
            "config",
            "Show or change shell preferences",
            CONFIG_USAGE,
            cmd_config,
        ),
        CommandEntry::new(
            "reset",
            "Delete all data and restore default settings",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let current = context.tracker.ledger().currency().clone();
            output::info(format!(
                "Currency: {} ({})",
                current,
                symbol_for(current.as_str()).unwrap_or("?")
            ));
            let supported: Vec<&str> = SUPPORTED_CURRENCIES.iter().map(|(code, _)| *code).collect();
            output::line(format!("  Supported: {}", supported.join(", ")));
            Ok(())
        }
        [code] => {
            context.tracker.set_currency(code)?;
            output::success(format!(
                "Currency set to {}.",
                context.tracker.ledger().currency()
            ));
            Ok(())
        }
        _ => Err(CommandError::usage("currency [code]")),
    }
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            match context.tracker.profile() {
                Some(profile) => print_profile(&profile),
                None => output::info("No profile saved yet."),
            }
            Ok(())
        }
        ["set", field, value @ ..] if !value.is_empty() => {
            let mut profile = context.tracker.profile().unwrap_or_default();
            if !profile.set_field(field, &value.join(" ")) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown profile field `{}`",
                    field
                )));
            }
            context.tracker.save_profile(&profile)?;
            output::success("Profile updated successfully!");
            Ok(())
        }
        ["export", path] => {
            context.tracker.export_profile(Path::new(path))?;
            output::success(format!("Profile exported to {}", path));
            Ok(())
        }
        ["import", path] => {
            let profile = context
                .tracker
                .import_profile(Path::new(path))
                .map_err(|err| {
                    CommandError::Message(format!("Error importing data: {}", err))
                })?;
            output::success(format!(
                "Profile for `{}` imported successfully!",
                profile.full_name
            ));
            Ok(())
        }
        _ => Err(CommandError::usage(PROFILE_USAGE)),
    }
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            let config = &context.config;
            output::section(format!("Config ({})", context.config_manager.config_path().display()));
            output::line(format!("  rows_per_page    : {}", config.rows_per_page));
            output::line(format!("  recent_count     : {}", config.recent_count));
            output::line(format!("  default_currency : {}", config.default_currency));
            Ok(())
        }
        ["set", key, value] => {
            let mut updated = context.config.clone();
            apply_config_value(&mut updated, key, value)?;
            context.config_manager.save(&updated)?;
            context.config = updated;
            output::success(format!("Config `{}` set to {}.", key, value));
            Ok(())
        }
        _ => Err(CommandError::usage(CONFIG_USAGE)),
    }
}

fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<(), CommandError> {
    let count = || -> Result<usize, CommandError> {
        match value.parse::<usize>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{}` must be a positive whole number",
                key
            ))),
        }
    };
    match key {
        "rows_per_page" => config.rows_per_page = count()?,
        "recent_count" => config.recent_count = count()?,
        "default_currency" => {
            let code = CurrencyCode::new(value);
            if !is_supported(&code) {
                return Err(CommandError::InvalidArguments(format!(
                    "unsupported currency `{}`",
                    value
                )));
            }
            config.default_currency = code;
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}` (expected one of {})",
                other,
                CONFIG_KEYS.join(", ")
            )))
        }
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Delete ALL transactions, settings and profile data? This cannot be undone.")? {
        output::info("Reset cancelled.");
        return Ok(());
    }
    context.tracker.reset()?;
    context.criteria = Default::default();
    output::success("All data has been reset.");
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    let flag = |value: bool| if value { "on" } else { "off" };
    output::section(format!("Profile ({})", profile.initials()));
    output::line(format!("  Name           : {}", profile.full_name));
    output::line(format!("  Email          : {}", profile.email));
    output::line(format!("  Phone          : {}", profile.phone));
    output::line(format!("  Location       : {}", profile.location));
    output::line(format!("  Currency       : {}", profile.currency));
    output::line(format!("  Month start    : {}", profile.month_start));
    output::line(format!(
        "  Notifications  : email {}, weekly {}, budget {}, balance {}",
        flag(profile.email_notifications),
        flag(profile.weekly_reports),
        flag(profile.budget_alerts),
        flag(profile.balance_alerts)
    ));
}

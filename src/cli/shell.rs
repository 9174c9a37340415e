use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Context as ReadlineContext, Editor, Helper,
};
use shell_words::split;

use super::commands::settings::CONFIG_KEYS;
use super::context::{CliMode, LoopControl, ShellContext};
use super::errors::{CliError, CommandError};
use super::output;
use super::registry::CommandEntry;
use crate::currency::SUPPORTED_CURRENCIES;
use crate::domain::Category;

pub const SCRIPT_ENV: &str = "SPENDORA_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.registry.list())));
    output::info("Spendora budget tracker. Type `help` for commands.");

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) if context.confirm_exit()? => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        editor.add_history_entry(trimmed).ok();
        if !execute(context, trimmed)? {
            break;
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running || !execute(context, &line?)? {
            break;
        }
    }
    Ok(())
}

/// Runs one line and reports command failures. Returns `false` once the shell should stop.
fn execute(context: &mut ShellContext, line: &str) -> Result<bool, CliError> {
    match handle_line(context, line) {
        Ok(LoopControl::Continue) => Ok(true),
        Ok(LoopControl::Exit) => Ok(false),
        Err(err) => {
            context.report_error(err)?;
            Ok(true)
        }
    }
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.trim().to_string());
    tracing::debug!(command = %command, args = args.len(), "dispatching command");

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command words and the well-known argument values of each command.
struct CommandHelper {
    commands: Vec<(String, String)>,
}

impl CommandHelper {
    fn new<'a>(entries: impl Iterator<Item = &'a CommandEntry>) -> Self {
        let mut commands: Vec<(String, String)> = entries
            .map(|entry| (entry.name.to_string(), entry.usage.to_string()))
            .collect();
        commands.sort();
        commands.dedup_by(|a, b| a.0 == b.0);
        Self { commands }
    }

    fn candidates(&self, command: &str, position: usize) -> Vec<String> {
        match (command, position) {
            ("add", 0) => owned(&["income", "expense"]),
            ("add", 2) => Category::ALL.iter().map(|c| c.key().to_string()).collect(),
            ("report" | "insights", 0) => owned(PERIOD_TOKENS),
            ("currency", 0) => SUPPORTED_CURRENCIES
                .iter()
                .map(|(code, _)| code.to_string())
                .collect(),
            ("profile", 0) => owned(&["show", "set", "export", "import"]),
            ("balance", 0) => owned(&["set"]),
            ("config", 0) => owned(&["show", "set"]),
            ("config", 1) => owned(CONFIG_KEYS),
            ("filter", _) => owned(&[
                "reset", "category=", "type=", "month=", "year=", "from=", "to=",
            ]),
            ("help", 0) => self.commands.iter().map(|(name, _)| name.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

const PERIOD_TOKENS: &[&str] = &[
    "current-month",
    "last-month",
    "last-3-months",
    "last-6-months",
    "current-year",
    "last-year",
    "custom",
    "all",
];

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();

        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let pool = match words.split_first() {
            None => self.commands.iter().map(|(name, _)| name.clone()).collect(),
            Some((command, args)) => self.candidates(&command.to_ascii_lowercase(), args.len()),
        };

        let candidates = pool
            .into_iter()
            .filter(|value| value.to_ascii_lowercase().starts_with(&needle))
            .map(|value| Pair {
                display: value.clone(),
                replacement: value,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    /// Shows the usage line once a complete command word has been typed.
    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() || !line.ends_with(' ') {
            return None;
        }
        let word = line.trim();
        if word.contains(char::is_whitespace) {
            return None;
        }
        self.commands
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .and_then(|(name, usage)| usage.strip_prefix(name.as_str()))
            .map(|rest| rest.trim_start().to_string())
            .filter(|rest| !rest.is_empty())
    }
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line("add expense 20 food \"Corner shop\"").unwrap();
        assert_eq!(tokens.last().map(String::as_str), Some("Corner shop"));
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        assert!(parse_command_line("add \"oops").is_err());
    }

    fn helper() -> CommandHelper {
        let mut registry = crate::cli::registry::CommandRegistry::new();
        crate::cli::commands::register_all(&mut registry);
        CommandHelper::new(registry.list())
    }

    #[test]
    fn argument_candidates_follow_the_command() {
        let helper = helper();
        assert!(helper.candidates("report", 0).contains(&"last-month".to_string()));
        assert!(helper.candidates("add", 2).contains(&"entertainment".to_string()));
        assert!(helper.candidates("currency", 0).contains(&"NGN".to_string()));
        assert!(helper.candidates("list", 0).is_empty());
    }

    #[test]
    fn commands_are_sorted_and_unique() {
        let binding = helper();
        let names: Vec<&str> = binding.commands.iter().map(|(n, _)| n.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert!(names.contains(&"breakdown"));
    }
}

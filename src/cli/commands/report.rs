use std::path::PathBuf;

use crate::cli::context::{parse_amount, parse_date, CommandResult, ShellContext};
use crate::cli::errors::CommandError;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::currency::format_date;
use crate::ledger::insights::{Insight, Severity};
use crate::ledger::summary::percentage;
use crate::ledger::{insights, DateWindow, Period};

const REPORT_USAGE: &str = "report [period] [start end]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "balance",
            "Show the balance or set the starting balance",
            "balance [set <amount>]",
            cmd_balance,
        ),
        CommandEntry::new(
            "breakdown",
            "Show expenses by category",
            "breakdown",
            cmd_breakdown,
        ),
        CommandEntry::new(
            "report",
            "Summarise a period (current-month, last-month, last-3-months, last-6-months, current-year, last-year, custom, all)",
            REPORT_USAGE,
            cmd_report,
        ),
        CommandEntry::new(
            "insights",
            "Show spending insights",
            "insights [period]",
            cmd_insights,
        ),
        CommandEntry::new(
            "export",
            "Export the filtered transactions as CSV",
            "export [directory]",
            cmd_export,
        ),
    ]
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        ["set", amount] => {
            let amount = parse_amount(amount)?;
            context.tracker.set_starting_balance(amount)?;
            output::success(format!(
                "Starting balance set to {}.",
                context.format_amount(amount)
            ));
        }
        _ => return Err(CommandError::usage("balance [set <amount>]")),
    }

    let ledger = context.tracker.ledger();
    let totals = crate::ledger::totals(ledger.transactions());
    output::section("Balance");
    output::line(format!("  Balance  : {}", context.format_amount(ledger.balance())));
    output::line(format!("  Income   : {}", context.format_amount(totals.income)));
    output::line(format!("  Expenses : {}", context.format_amount(totals.expense)));
    output::line(format!("  Records  : {}", totals.count));
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let breakdown = context.tracker.ledger().breakdown();
    output::section("Expenses by category");
    if breakdown.chart.empty {
        output::info(&breakdown.chart.labels[0]);
        return Ok(());
    }
    let total = breakdown.chart.total;
    for (category, amount) in breakdown.category_totals.iter() {
        output::line(format!(
            "  {:<14} {:>14} {:>4}%",
            category.name(),
            context.format_amount(amount),
            percentage(amount, total)
        ));
    }
    output::line(format!("  {:<14} {:>14}", "Total", context.format_amount(total)));
    if let Some((category, amount)) = breakdown.stats.highest {
        output::info(format!(
            "Top category: {} ({}, {}% of spending)",
            category.name(),
            context.format_amount(amount),
            breakdown.stats.highest_share
        ));
    }
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = parse_period(args, "current-month")?;
    let today = context.today();
    let ledger = context.tracker.ledger();
    let report = ledger.report(period, today);

    output::section(format!("Report: {} ({})", report.period.label(), report.window));
    if report.transactions.is_empty() {
        output::info("No transactions in this period.");
        return Ok(());
    }

    let totals = report.totals;
    output::line(format!("  Income       : {}", context.format_amount(totals.income)));
    output::line(format!("  Expenses     : {}", context.format_amount(totals.expense)));
    output::line(format!("  Net savings  : {}", context.format_amount(totals.net())));
    output::line(format!("  Transactions : {}", totals.count));
    output::line(format!(
        "  Budget used  : {}%",
        report.performance.percent_used
    ));
    output::line(format!(
        "  Savings rate : {}%",
        report.performance.savings_rate
    ));

    if let Some((category, amount)) = report.stats.highest {
        output::line(format!(
            "  Top category : {} ({})",
            category.name(),
            context.format_amount(amount)
        ));
    }
    output::line(format!(
        "  Avg/category : {}",
        context.format_amount(report.stats.average)
    ));

    output::section("Daily trend");
    for point in &report.trend {
        output::line(format!(
            "  {:<11} +{:<14} -{:<14} {}",
            format_date(point.date),
            context.format_amount(point.income),
            context.format_amount(point.expense),
            context.format_amount(point.net())
        ));
    }

    print_insights(&report.insights);
    Ok(())
}

fn cmd_insights(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = parse_period(args, "all")?;
    let window = period.window(context.today());
    let view = crate::ledger::filter::in_window(context.tracker.ledger().transactions(), window);
    if view.is_empty() {
        output::info("No transactions to analyse.");
        return Ok(());
    }
    print_insights(&insights(view));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args {
        [] => PathBuf::from("."),
        [dir] => PathBuf::from(dir),
        _ => return Err(CommandError::usage("export [directory]")),
    };
    let path = context.tracker.export_csv(&context.criteria, &dir)?;
    output::success(format!("Exported to {}", path.display()));
    Ok(())
}

fn parse_period(args: &[&str], default: &str) -> Result<Period, CommandError> {
    let (token, custom) = match args {
        [] => (default, None),
        [token] => (*token, None),
        [token, start, end] => {
            let window = DateWindow::new(parse_date(start)?, parse_date(end)?)?;
            (*token, Some(window))
        }
        _ => return Err(CommandError::usage(REPORT_USAGE)),
    };
    Ok(Period::from_token(token, custom)?)
}

fn print_insights(found: &[Insight]) {
    output::section("Insights");
    for insight in found {
        let text = format!("{}: {}", insight.title, insight.description);
        match insight.severity {
            Severity::Danger => output::error(text),
            Severity::Warning => output::warning(text),
            Severity::Success => output::success(text),
            Severity::Info => output::info(text),
        }
    }
}

use crate::cli::context::{parse_amount, parse_date, CommandResult, ShellContext};
use crate::cli::errors::CommandError;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::currency::format_date;
use crate::domain::{Category, Transaction, TransactionId, TransactionInput, TransactionType};
use crate::ledger::{paginate, sort_newest_first, DateWindow, FilterCriteria};

const ADD_USAGE: &str = "add <income|expense> <amount> <category> <name> [YYYY-MM-DD]";
const FILTER_USAGE: &str =
    "filter [reset | category=<c> type=<t> month=<1-12> year=<yyyy> from=<date> to=<date>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record an income or expense", ADD_USAGE, cmd_add),
        CommandEntry::new(
            "list",
            "List transactions matching the active filter",
            "list [page]",
            cmd_list,
        ),
        CommandEntry::new("recent", "Show the newest transactions", "recent [count]", cmd_recent),
        CommandEntry::new("filter", "Show or change the active filter", FILTER_USAGE, cmd_filter),
        CommandEntry::new(
            "delete",
            "Delete transactions by id",
            "delete <id> [id ...]",
            cmd_delete,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [kind, amount, category, name, rest @ ..] = args else {
        return Err(CommandError::usage(ADD_USAGE));
    };
    if rest.len() > 1 {
        return Err(CommandError::usage(ADD_USAGE));
    }

    let kind: TransactionType = kind
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("unknown type `{}`", kind)))?;
    let category = Category::lookup(category).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown category `{}` (expected one of: {})",
            category,
            category_keys()
        ))
    })?;

    let mut input = TransactionInput::new(*name, parse_amount(amount)?, kind).with_category(category);
    if let Some(date) = rest.first() {
        input = input.on(parse_date(date)?);
    }

    let created = context.tracker.add_transaction(input)?;
    output::success(format!(
        "Added {} `{}` ({}) on {} [{}]",
        created.kind(),
        created.name(),
        context.format_amount(created.amount()),
        format_date(created.date()),
        created.id()
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let page = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid page `{}`", raw)))?,
        None => 1,
    };

    let ledger = context.tracker.ledger();
    let mut view = ledger.filter(&context.criteria);
    sort_newest_first(&mut view);
    if view.is_empty() {
        output::info("No transactions found.");
        return Ok(());
    }

    let page = paginate(&view, page, context.config.rows_per_page);
    output::section(format!(
        "Transactions (page {} of {}, {} total)",
        page.page, page.total_pages, page.total_items
    ));
    for txn in &page.items {
        print_row(context, txn);
    }
    if page.has_next() {
        output::hint(format!("Use `list {}` for more.", page.page + 1));
    }
    Ok(())
}

fn cmd_recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let count = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid count `{}`", raw)))?,
        None => context.config.recent_count,
    };
    let recent = context.tracker.ledger().recent(count);
    if recent.is_empty() {
        output::info("No transactions yet.");
        return Ok(());
    }
    output::section("Recent transactions");
    for txn in recent {
        print_row(context, txn);
    }
    Ok(())
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        describe_filter(&context.criteria);
        return Ok(());
    }
    if args.len() == 1 && args[0].eq_ignore_ascii_case("reset") {
        context.criteria = FilterCriteria::all();
        output::success("Filter cleared.");
        return Ok(());
    }

    let mut criteria = context.criteria.clone();
    let mut from = criteria.window.map(|window| window.start);
    let mut to = criteria.window.map(|window| window.end);
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| CommandError::usage(FILTER_USAGE))?;
        match key.to_ascii_lowercase().as_str() {
            "from" => from = parse_bound(value)?,
            "to" => to = parse_bound(value)?,
            _ => criteria.set(key, value)?,
        }
    }
    criteria.window = match (from, to) {
        (Some(start), Some(end)) => Some(DateWindow::new(start, end)?),
        (None, None) => None,
        _ => {
            return Err(CommandError::InvalidArguments(
                "a date range needs both `from` and `to`".into(),
            ))
        }
    };

    context.criteria = criteria;
    let matching = context.tracker.ledger().filter(&context.criteria).len();
    output::success(format!("Filter updated; {} transaction(s) match.", matching));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("delete <id> [id ...]"));
    }
    let ids: Vec<TransactionId> = args.iter().map(|id| TransactionId::from(*id)).collect();

    let prompt = if ids.len() == 1 {
        "Are you sure you want to delete this transaction?".to_string()
    } else {
        format!("Are you sure you want to delete {} transactions?", ids.len())
    };
    if !context.confirm(&prompt)? {
        output::info("Deletion cancelled.");
        return Ok(());
    }

    let removed = context.tracker.delete_many(&ids)?;
    if removed == 0 {
        output::warning("No matching transactions.");
    } else {
        output::success(format!("Deleted {} transaction(s).", removed));
    }
    Ok(())
}

fn print_row(context: &ShellContext, txn: &Transaction) {
    let sign = if txn.is_income() { "+" } else { "-" };
    output::line(format!(
        "  {}  {:<11} {:<24} {:<14} {}{}",
        txn.id(),
        format_date(txn.date()),
        txn.name(),
        txn.category().name(),
        sign,
        context.format_amount(txn.amount())
    ));
}

fn describe_filter(criteria: &FilterCriteria) {
    if criteria.is_unfiltered() {
        output::info("No filter active.");
        return;
    }
    output::section("Active filter");
    if let Some(category) = criteria.category {
        output::line(format!("  category : {}", category));
    }
    if let Some(kind) = criteria.kind {
        output::line(format!("  type     : {}", kind));
    }
    if let Some(month) = criteria.month {
        output::line(format!("  month    : {}", month));
    }
    if let Some(year) = criteria.year {
        output::line(format!("  year     : {}", year));
    }
    if let Some(window) = criteria.window {
        output::line(format!("  range    : {}", window));
    }
}

fn parse_bound(value: &str) -> Result<Option<chrono::NaiveDate>, CommandError> {
    if value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        parse_date(value).map(Some)
    }
}

fn category_keys() -> String {
    Category::ALL
        .iter()
        .map(|category| category.key())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::cli::context::test_support::script_context;
    use crate::domain::Category;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn add_defaults_date_to_today() {
        let (_home, mut context) = script_context(today());
        context.process_line("add income 5000 other Salary").unwrap();
        let txn = &context.tracker.ledger().transactions()[0];
        assert_eq!(txn.date(), today());
        assert!(txn.is_income());
    }

    #[test]
    fn add_rejects_unknown_category() {
        let (_home, mut context) = script_context(today());
        assert!(context.process_line("add expense 5 groceries Milk").is_err());
        assert!(context.tracker.ledger().is_empty());
    }

    #[test]
    fn add_reports_validation_messages() {
        let (_home, mut context) = script_context(today());
        let err = context
            .process_line("add expense 0 food \"  \"")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Name is required"));
        assert!(message.contains("Amount must be > 0"));
    }

    #[test]
    fn filter_accepts_date_ranges() {
        let (_home, mut context) = script_context(today());
        context
            .process_line("filter category=rent from=2024-01-01 to=2024-01-31")
            .unwrap();
        assert_eq!(context.criteria.category, Some(Category::Rent));
        assert!(context.criteria.window.is_some());
        assert!(context.process_line("filter from=2024-01-01 to=all").is_err());
    }

    #[test]
    fn delete_of_unknown_id_keeps_records() {
        let (_home, mut context) = script_context(today());
        context.process_line("add expense 10 food Snack").unwrap();
        context.process_line("delete missing-id").unwrap();
        assert_eq!(context.tracker.ledger().len(), 1);
    }
}

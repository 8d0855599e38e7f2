//! Command handlers for the expense shell.

use std::path::Path;

use tracker_core::{
    looks_like_date, parse_amount_bound, parse_date, BudgetInput, Comparator, ExpenseInput,
    RecurrenceService, RecurringInput, SortColumn, SortDirection,
};
use tracker_domain::{format_amount, Expense, ALL_CATEGORIES};

use crate::cli::{
    context::{CommandError, CommandResult, ShellContext},
    output,
    registry::{CommandEntry, CommandRegistry},
};

/// Placeholder accepted by range filters for an open bound.
const OPEN_BOUND: &str = "-";

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let entries = [
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
        CommandEntry::new(
            "add",
            "Record an expense (date defaults to today)",
            "add <amount> <category> [date] [description]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Replace the expense at a listed row",
            "edit <row> <amount> <category> <date> [description]",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Delete the expense at a listed row", "delete <row>", cmd_delete),
        CommandEntry::new("list", "List expenses in the current view", "list", cmd_list),
        CommandEntry::new(
            "filter",
            "Narrow the view by date, category, amount or search text",
            "filter <date|category|amount|search> <value...>",
            cmd_filter,
        ),
        CommandEntry::new("clear-filters", "Reset every filter", "clear-filters", cmd_clear_filters),
        CommandEntry::new(
            "sort",
            "Sort the view by a column, or restore insertion order",
            "sort <amount|category|date|description|none> [asc|desc]",
            cmd_sort,
        ),
        CommandEntry::new("report", "Spending by category for the current view", "report", cmd_report),
        CommandEntry::new("categories", "Show the category tree", "categories", cmd_categories),
        CommandEntry::new("add-category", "Create a category", "add-category <name>", cmd_add_category),
        CommandEntry::new(
            "rename-category",
            "Rename a category (existing expenses keep the old name)",
            "rename-category <name> <new name>",
            cmd_rename_category,
        ),
        CommandEntry::new(
            "delete-category",
            "Delete a category; its subcategories move to the top level",
            "delete-category <name>",
            cmd_delete_category,
        ),
        CommandEntry::new(
            "add-subcategory",
            "Place a category under another",
            "add-subcategory <parent> <child>",
            cmd_add_subcategory,
        ),
        CommandEntry::new(
            "remove-subcategory",
            "Detach a subcategory from its parent",
            "remove-subcategory <parent> <child>",
            cmd_remove_subcategory,
        ),
        CommandEntry::new("budgets", "List budgets", "budgets", cmd_budgets),
        CommandEntry::new(
            "add-budget",
            "Create a budget",
            "add-budget <category> <amount> <weekly|monthly|yearly>",
            cmd_add_budget,
        ),
        CommandEntry::new(
            "edit-budget",
            "Replace the budget at a listed row",
            "edit-budget <row> <category> <amount> <weekly|monthly|yearly>",
            cmd_edit_budget,
        ),
        CommandEntry::new(
            "delete-budget",
            "Delete the budget at a listed row",
            "delete-budget <row>",
            cmd_delete_budget,
        ),
        CommandEntry::new(
            "budget-status",
            "Spending against each budget for the current period",
            "budget-status",
            cmd_budget_status,
        ),
        CommandEntry::new("recurring", "List recurring expense templates", "recurring", cmd_recurring),
        CommandEntry::new(
            "add-recurring",
            "Create a recurring expense template",
            "add-recurring <amount> <category> <start> <daily|weekly|monthly|yearly> [description]",
            cmd_add_recurring,
        ),
        CommandEntry::new(
            "edit-recurring",
            "Replace the recurring template at a listed row",
            "edit-recurring <row> <amount> <category> <start> <daily|weekly|monthly|yearly> [description]",
            cmd_edit_recurring,
        ),
        CommandEntry::new(
            "delete-recurring",
            "Delete the recurring template at a listed row",
            "delete-recurring <row>",
            cmd_delete_recurring,
        ),
        CommandEntry::new("generate", "Materialize due recurring expenses", "generate", cmd_generate),
        CommandEntry::new("import", "Append expenses from a CSV file", "import <path>", cmd_import),
        CommandEntry::new("export", "Write all expenses to a CSV file", "export <path>", cmd_export),
    ];
    for entry in entries {
        registry.register(entry);
    }
}

fn usage_error(context: &ShellContext, command: &str) -> CommandError {
    let usage = context
        .registry
        .get(command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("Usage: {}", usage))
}

fn joined(args: &[&str]) -> Option<String> {
    let text = args.join(" ");
    (!text.trim().is_empty()).then_some(text)
}

/// Converts a 1-based row number into a view index.
fn parse_row(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "Row must be a positive number, got `{}`.",
            raw
        ))),
    }
}

fn optional_bound<T>(
    raw: &str,
    parse: impl Fn(&str) -> Result<T, tracker_core::CoreError>,
) -> Result<Option<T>, CommandError> {
    if raw == OPEN_BOUND {
        Ok(None)
    } else {
        Ok(Some(parse(raw)?))
    }
}

fn money(context: &ShellContext, amount: f64) -> String {
    context.config().format_money(amount)
}

fn expense_line(context: &ShellContext, row: usize, expense: &Expense) -> String {
    let date = context.config().format_date(expense.date);
    format!(
        "{:>3}. {}  {:<14} {:>12}  {}",
        row + 1,
        date,
        expense.category,
        money(context, expense.amount),
        expense.description
    )
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| CommandError::InvalidArguments(format!("Unknown command `{}`.", name)))?;
        output::info(format!("{}: {}", entry.name, entry.description));
        output::line(format!("  usage: {}", entry.usage));
        return Ok(());
    }
    output::section("Commands");
    for entry in context.registry.list() {
        output::line(format!("  {:<16} {}", entry.name, entry.description));
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Goodbye.");
    Err(CommandError::ExitRequested)
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(usage_error(context, "add"));
    }
    let today = context.tracker.today().to_string();
    let (date, rest) = match args.get(2) {
        Some(candidate) if looks_like_date(candidate) => (*candidate, &args[3..]),
        _ => (today.as_str(), args.get(2..).unwrap_or(&[])),
    };
    let description = joined(rest);
    let expense = context.tracker.add_expense(ExpenseInput {
        amount: Some(args[0]),
        category: Some(args[1]),
        date: Some(date),
        description: description.as_deref(),
    })?;
    output::success(format!(
        "Expense recorded: {} {} on {}.",
        expense.category,
        money(context, expense.amount),
        expense.date
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(usage_error(context, "edit"));
    }
    let index = parse_row(args[0])?;
    let description = joined(&args[4..]);
    let expense = context.tracker.edit_expense(
        index,
        ExpenseInput {
            amount: Some(args[1]),
            category: Some(args[2]),
            date: Some(args[3]),
            description: description.as_deref(),
        },
    )?;
    output::success(format!(
        "Expense updated: {} {} on {}.",
        expense.category,
        money(context, expense.amount),
        expense.date
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row] = args else {
        return Err(usage_error(context, "delete"));
    };
    let removed = context.tracker.delete_expense(parse_row(row)?)?;
    output::success(format!(
        "Expense deleted: {} {} on {}.",
        removed.category,
        money(context, removed.amount),
        removed.date
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context.tracker.rows().to_vec();
    output::section("Expenses");
    if rows.is_empty() {
        output::info("No expenses match the current view.");
    }
    for (index, expense) in rows.iter().enumerate() {
        output::line(expense_line(context, index, expense));
    }
    let total = context.tracker.total_spent();
    output::line(format!("Total Spent: {}", money(context, total)));
    Ok(())
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((key, values)) = args.split_first() else {
        return Err(usage_error(context, "filter"));
    };
    let view = context.tracker.view_mut();
    match (key.to_ascii_lowercase().as_str(), values) {
        ("date", [start, end]) => {
            let start = optional_bound(start, parse_date)?;
            let end = optional_bound(end, parse_date)?;
            view.set_date_range(start, end);
        }
        ("category", [_, ..]) => {
            let category = values.join(" ");
            view.set_category((category != ALL_CATEGORIES).then_some(category));
        }
        ("amount", [min, max]) => {
            let min = optional_bound(min, parse_amount_bound)?;
            let max = optional_bound(max, parse_amount_bound)?;
            view.set_amount_range(min, max);
        }
        ("search", [_, ..]) => view.set_search_text(joined(values)),
        _ => return Err(usage_error(context, "filter")),
    }
    let count = context.tracker.rows().len();
    output::info(format!("{} expense(s) match the current view.", count));
    Ok(())
}

fn cmd_clear_filters(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.tracker.view_mut().clear_filters();
    output::success("Filters cleared.");
    Ok(())
}

fn cmd_sort(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let comparator = match args {
        ["none"] => None,
        [column] | [column, _] => {
            let column: SortColumn = column
                .parse()
                .map_err(|err| CommandError::InvalidArguments(format!("{}", err)))?;
            let direction = match args.get(1) {
                Some(raw) => raw
                    .parse::<SortDirection>()
                    .map_err(|err| CommandError::InvalidArguments(format!("{}", err)))?,
                None => SortDirection::default(),
            };
            Some(Comparator::Column(column, direction))
        }
        _ => return Err(usage_error(context, "sort")),
    };
    let message = match &comparator {
        Some(Comparator::Column(column, SortDirection::Descending)) => {
            format!("Sorted by {} (descending).", column)
        }
        Some(Comparator::Column(column, _)) => format!("Sorted by {}.", column),
        _ => "Insertion order restored.".to_string(),
    };
    context.tracker.view_mut().set_comparator(comparator);
    output::success(message);
    Ok(())
}

fn cmd_report(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = context.tracker.report();
    output::section("Category Report");
    for row in &report.rows {
        output::line(format!(
            "  {:<16} {:>12}  {:>6.2}%",
            row.category_name,
            money(context, row.total_amount),
            row.percentage
        ));
    }
    output::line(format!("Total: {}", money(context, report.grand_total)));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let arena = context.tracker.category_arena();
    output::section("Categories");
    let mut stack: Vec<(usize, &str)> = arena
        .roots()
        .iter()
        .rev()
        .map(|category| (0, category.id.as_str()))
        .collect();
    let mut visited = std::collections::HashSet::new();
    while let Some((depth, id)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(category) = arena.get(id) else {
            continue;
        };
        output::line(format!(
            "{}{} ({}, {})",
            "  ".repeat(depth + 1),
            category.name,
            category.color,
            category.icon
        ));
        for child in arena.subcategory_ids(id).iter().rev() {
            stack.push((depth + 1, child.as_str()));
        }
    }
    Ok(())
}

fn cmd_add_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = joined(args) else {
        return Err(usage_error(context, "add-category"));
    };
    let category = context.tracker.add_category(&name)?;
    output::success(format!("Category `{}` added.", category.name));
    Ok(())
}

fn cmd_rename_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((name, rest)) = args.split_first() else {
        return Err(usage_error(context, "rename-category"));
    };
    let Some(new_name) = joined(rest) else {
        return Err(usage_error(context, "rename-category"));
    };
    let category = context.tracker.rename_category(name, &new_name)?;
    output::success(format!("Category `{}` renamed to `{}`.", name, category.name));
    Ok(())
}

fn cmd_delete_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = joined(args) else {
        return Err(usage_error(context, "delete-category"));
    };
    let category = context.tracker.delete_category(&name)?;
    output::success(format!("Category `{}` deleted.", category.name));
    Ok(())
}

fn cmd_remove_subcategory(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [parent, child] = args else {
        return Err(usage_error(context, "remove-subcategory"));
    };
    if context.tracker.remove_subcategory(parent, child)? {
        output::success(format!("`{}` is no longer a subcategory of `{}`.", child, parent));
    } else {
        output::warning(format!("`{}` is not a subcategory of `{}`.", child, parent));
    }
    Ok(())
}

fn cmd_add_subcategory(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [parent, child] = args else {
        return Err(usage_error(context, "add-subcategory"));
    };
    if context.tracker.add_subcategory(parent, child)? {
        output::success(format!("`{}` is now a subcategory of `{}`.", child, parent));
    } else {
        output::warning("A category cannot be its own subcategory.");
    }
    Ok(())
}

fn cmd_budgets(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Budgets");
    if context.tracker.budgets().is_empty() {
        output::info("No budgets defined.");
    }
    for (index, budget) in context.tracker.budgets().iter().enumerate() {
        output::line(format!(
            "{:>3}. {:<16} {:>12}  {}",
            index + 1,
            budget.category,
            money(context, budget.amount),
            budget.period
        ));
    }
    Ok(())
}

fn cmd_add_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, amount, period] = args else {
        return Err(usage_error(context, "add-budget"));
    };
    let budget = context.tracker.add_budget(BudgetInput {
        category: Some(*category),
        amount: Some(*amount),
        period: Some(*period),
    })?;
    output::success(format!(
        "Budget added: {} {} {}.",
        budget.category,
        money(context, budget.amount),
        budget.period
    ));
    Ok(())
}

fn cmd_edit_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row, category, amount, period] = args else {
        return Err(usage_error(context, "edit-budget"));
    };
    let budget = context.tracker.edit_budget(
        parse_row(row)?,
        BudgetInput {
            category: Some(*category),
            amount: Some(*amount),
            period: Some(*period),
        },
    )?;
    output::success(format!(
        "Budget updated: {} {} {}.",
        budget.category,
        money(context, budget.amount),
        budget.period
    ));
    Ok(())
}

fn cmd_delete_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row] = args else {
        return Err(usage_error(context, "delete-budget"));
    };
    let budget = context.tracker.delete_budget(parse_row(row)?)?;
    output::success(format!(
        "Budget deleted: {} {}.",
        budget.category, budget.period
    ));
    Ok(())
}

fn cmd_budget_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let statuses = context.tracker.budget_statuses();
    output::section("Budget Status");
    if statuses.is_empty() {
        output::info("No budgets defined.");
    }
    for status in &statuses {
        let line = format!(
            "  {:<16} {:<8} {} spent of {} ({:.0}%), {} remaining [{}]",
            status.budget.category,
            status.budget.period,
            money(context, status.spent),
            money(context, status.budget.amount),
            status.percent_used,
            money(context, status.remaining),
            status.window
        );
        if status.exceeded {
            output::warning(format!("{} EXCEEDED", line.trim_start()));
        } else {
            output::line(line);
        }
    }
    Ok(())
}

fn cmd_recurring(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Recurring Expenses");
    if context.tracker.recurring().is_empty() {
        output::info("No recurring expenses defined.");
    }
    for (index, template) in context.tracker.recurring().iter().enumerate() {
        let next = RecurrenceService::next_due(template)
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        output::line(format!(
            "{:>3}. {:<16} {:>12}  {:<8} from {}  next {}  {}",
            index + 1,
            template.category,
            money(context, template.amount),
            template.frequency,
            template.start_date,
            next,
            template.description
        ));
    }
    Ok(())
}

fn cmd_add_recurring(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(usage_error(context, "add-recurring"));
    }
    let description = joined(&args[4..]);
    let (template, outcome) = context.tracker.add_recurring(RecurringInput {
        amount: Some(args[0]),
        category: Some(args[1]),
        start_date: Some(args[2]),
        frequency: Some(args[3]),
        description: description.as_deref(),
    })?;
    output::success(format!(
        "Recurring expense added: {} {} {}.",
        template.category,
        format_amount(template.amount),
        template.frequency
    ));
    report_generation(outcome.generated.len(), outcome.capped);
    Ok(())
}

fn cmd_edit_recurring(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 5 {
        return Err(usage_error(context, "edit-recurring"));
    }
    let description = joined(&args[5..]);
    let (template, outcome) = context.tracker.edit_recurring(
        parse_row(args[0])?,
        RecurringInput {
            amount: Some(args[1]),
            category: Some(args[2]),
            start_date: Some(args[3]),
            frequency: Some(args[4]),
            description: description.as_deref(),
        },
    )?;
    output::success(format!(
        "Recurring expense updated: {} {} {}.",
        template.category,
        format_amount(template.amount),
        template.frequency
    ));
    report_generation(outcome.generated.len(), outcome.capped);
    Ok(())
}

fn cmd_delete_recurring(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row] = args else {
        return Err(usage_error(context, "delete-recurring"));
    };
    let template = context.tracker.delete_recurring(parse_row(row)?)?;
    output::success(format!(
        "Recurring expense deleted: {} {}. Generated expenses are kept.",
        template.category, template.frequency
    ));
    Ok(())
}

fn cmd_generate(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.tracker.generate_due()?;
    report_generation(outcome.generated.len(), outcome.capped);
    Ok(())
}

fn report_generation(count: usize, capped: bool) {
    if count == 0 {
        output::info("No recurring expenses due.");
    } else {
        output::success(format!("Generated {} recurring expense(s).", count));
    }
    if capped {
        output::warning("Generation limit reached; run `generate` again for the rest.");
    }
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage_error(context, "import"));
    };
    let report = context.tracker.import(Path::new(path))?;
    for warning in &report.warnings {
        output::warning(warning);
    }
    output::success(format!(
        "Imported {} expense(s); skipped {}.",
        report.records.len(),
        report.warnings.len()
    ));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage_error(context, "export"));
    };
    let count = context.tracker.export(Path::new(path))?;
    output::success(format!("Exported {} expense(s) to {}.", count, path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use tracker_config::Config;
    use tracker_core::{FixedClock, MemoryStorage};

    use crate::app::Tracker;
    use crate::cli::context::{CliMode, LoopControl, ShellContext};

    fn shell() -> ShellContext {
        shell_with(Config::default())
    }

    fn shell_with(config: Config) -> ShellContext {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        let tracker = Tracker::open(Arc::new(MemoryStorage::new()), Arc::new(clock), config);
        ShellContext::with_tracker(CliMode::Script, tracker)
    }

    fn run(shell: &mut ShellContext, line: &str) {
        shell.process_line(line).unwrap();
    }

    #[test]
    fn add_defaults_to_today_and_keeps_description() {
        let mut shell = shell();
        run(&mut shell, "add 12.50 Food \"Lunch with team\"");
        run(&mut shell, "add 3 Transport 2024-01-05 Bus");

        let expenses = shell.tracker().expenses();
        assert_eq!(expenses[0].date, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        assert_eq!(expenses[0].description, "Lunch with team");
        assert_eq!(expenses[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(expenses[1].description, "Bus");
    }

    #[test]
    fn rows_follow_filters_and_sorting() {
        let mut shell = shell();
        run(&mut shell, "add 10 Food 2024-01-01");
        run(&mut shell, "add 20 Food 2024-01-15");
        run(&mut shell, "add 5 Transport 2024-01-10");
        run(&mut shell, "sort amount desc");
        run(&mut shell, "delete 1");

        let amounts: Vec<_> = shell.tracker().expenses().iter().map(|e| e.amount).collect();
        assert_eq!(amounts, [10.0, 5.0]);

        run(&mut shell, "filter category Transport");
        run(&mut shell, "edit 1 6 Transport 2024-01-11 Taxi");
        assert_eq!(shell.tracker().expenses()[1].description, "Taxi");
    }

    #[test]
    fn invalid_input_is_reported_not_fatal() {
        let mut shell = shell();
        assert!(shell.process_line("add abc Food").is_err());
        assert!(shell.process_line("delete 9").is_err());
        assert!(shell.process_line("filter amount 5").is_err());
        assert!(shell.tracker().expenses().is_empty());
        assert_eq!(shell.process_line("nope").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut shell = shell();
        assert_eq!(shell.process_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn recurring_templates_generate_on_creation() {
        let mut shell = shell();
        run(&mut shell, "add-recurring 100 Utilities 2023-11-20 monthly Rent");
        assert_eq!(shell.tracker().expenses().len(), 3);
        run(&mut shell, "generate");
        assert_eq!(shell.tracker().expenses().len(), 3);
    }

    #[test]
    fn malformed_dates_are_rejected_not_described() {
        let mut shell = shell();
        assert!(shell.process_line("add 5 Food 2024-13-45 Lunch").is_err());
        assert!(shell.tracker().expenses().is_empty());
        run(&mut shell, "add 5 Food 2024 budget review");
        assert_eq!(shell.tracker().expenses()[0].description, "2024 budget review");
    }

    #[test]
    fn amount_filter_accepts_a_zero_lower_bound() {
        let mut shell = shell();
        run(&mut shell, "add 4 Food 2024-01-02");
        run(&mut shell, "add 40 Food 2024-01-03");
        run(&mut shell, "filter amount 0 10");
        assert_eq!(shell.tracker.rows().len(), 1);
        assert!(shell.process_line("filter amount -1 10").is_err());
    }

    #[test]
    fn listing_survives_an_unusable_date_format() {
        let mut shell = shell_with(Config {
            date_format: "%Q".to_string(),
            ..Config::default()
        });
        run(&mut shell, "add 4 Food 2024-01-02");
        run(&mut shell, "list");
    }

    #[test]
    fn budgets_and_templates_are_managed_by_row() {
        let mut shell = shell();
        run(&mut shell, "add-budget Food 200 monthly");
        run(&mut shell, "edit-budget 1 Food 250 weekly");
        assert!((shell.tracker().budgets()[0].amount - 250.0).abs() < 1e-9);
        assert!(shell.process_line("edit-budget 2 Food 250 weekly").is_err());
        run(&mut shell, "delete-budget 1");
        assert!(shell.tracker().budgets().is_empty());

        run(&mut shell, "add-recurring 100 Utilities 2024-01-01 monthly Rent");
        assert_eq!(shell.tracker().expenses().len(), 1);
        run(&mut shell, "edit-recurring 1 100 Utilities 2024-01-01 weekly Rent");
        assert_eq!(shell.tracker().expenses().len(), 3);
        run(&mut shell, "delete-recurring 1");
        assert!(shell.tracker().recurring().is_empty());
        assert_eq!(shell.tracker().expenses().len(), 3);
    }

    #[test]
    fn categories_are_renamed_detached_and_deleted() {
        let mut shell = shell();
        run(&mut shell, "add-category Snacks");
        run(&mut shell, "add-subcategory Food Snacks");
        run(&mut shell, "rename-category Snacks Treats");
        run(&mut shell, "remove-subcategory Food Treats");
        let arena = shell.tracker().category_arena();
        assert!(!arena.find_by_name("Treats").unwrap().is_subcategory());

        run(&mut shell, "delete-category Treats");
        assert!(shell.tracker().category_arena().find_by_name("Treats").is_none());
        assert!(shell.process_line("delete-category Treats").is_err());
    }
}

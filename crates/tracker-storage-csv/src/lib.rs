//! CSV persistence for the expense tracker.

mod columns;
pub mod transfer;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use tracker_core::{parse_amount, CoreError, CoreResult, LoadReport, PersistenceAdapter};
use tracker_domain::{
    format_amount, Budget, BudgetPeriod, Category, Expense, Frequency, RecurringExpense,
    DEFAULT_USER_ID,
};

use crate::columns::{read_rows, write_rows, Columns};

pub use transfer::{export_expenses, import_expenses, ImportReport};

pub const EXPENSES_FILE: &str = "expenses.csv";
pub const CATEGORIES_FILE: &str = "categories.csv";
pub const RECURRING_FILE: &str = "recurring_expenses.csv";
pub const BUDGETS_FILE: &str = "budgets.csv";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const EXPENSE_HEADER: [&str; 5] = ["id", "amount", "category", "date", "description"];
pub(crate) const EXPENSE_REQUIRED: [&str; 3] = ["amount", "category", "date"];

const CATEGORY_HEADER: [&str; 6] = ["userId", "name", "color", "icon", "id", "parentId"];
const CATEGORY_REQUIRED: [&str; 1] = ["name"];

const RECURRING_HEADER: [&str; 7] = [
    "id",
    "amount",
    "category",
    "startDate",
    "frequency",
    "description",
    "lastGenerated",
];
const RECURRING_REQUIRED: [&str; 4] = ["amount", "category", "startDate", "frequency"];

const BUDGET_HEADER: [&str; 4] = ["id", "category", "budgetAmount", "period"];
const BUDGET_REQUIRED: [&str; 3] = ["category", "budgetAmount", "period"];

const FALLBACK_COLOR: &str = "#FFFFFF";
const FALLBACK_ICON: &str = "default_icon";

/// Flat-file storage: one CSV file per record type inside a data directory.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    data_dir: PathBuf,
}

impl CsvStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn file_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

impl PersistenceAdapter for CsvStorage {
    fn load_expenses(&self) -> CoreResult<LoadReport<Expense>> {
        read_rows(
            &self.file_path(EXPENSES_FILE),
            &EXPENSE_REQUIRED,
            parse_expense,
        )
    }

    fn save_expenses(&self, expenses: &[Expense]) -> CoreResult<()> {
        write_rows(
            &self.file_path(EXPENSES_FILE),
            &EXPENSE_HEADER,
            expenses.iter().map(expense_row),
        )
    }

    fn load_categories(&self) -> CoreResult<LoadReport<Category>> {
        read_rows(
            &self.file_path(CATEGORIES_FILE),
            &CATEGORY_REQUIRED,
            parse_category,
        )
    }

    fn save_categories(&self, categories: &[Category]) -> CoreResult<()> {
        write_rows(
            &self.file_path(CATEGORIES_FILE),
            &CATEGORY_HEADER,
            categories.iter().map(|category| {
                vec![
                    category.user_id.clone(),
                    category.name.clone(),
                    category.color.clone(),
                    category.icon.clone(),
                    category.id.clone(),
                    category.parent_id.clone().unwrap_or_default(),
                ]
            }),
        )
    }

    fn load_recurring_expenses(&self) -> CoreResult<LoadReport<RecurringExpense>> {
        read_rows(
            &self.file_path(RECURRING_FILE),
            &RECURRING_REQUIRED,
            parse_recurring,
        )
    }

    fn save_recurring_expenses(&self, templates: &[RecurringExpense]) -> CoreResult<()> {
        write_rows(
            &self.file_path(RECURRING_FILE),
            &RECURRING_HEADER,
            templates.iter().map(|template| {
                vec![
                    template.id.clone(),
                    format_amount(template.amount),
                    template.category.clone(),
                    template.start_date.format(DATE_FORMAT).to_string(),
                    template.frequency.to_string(),
                    template.description.clone(),
                    template
                        .last_generated
                        .map(|date| date.format(DATE_FORMAT).to_string())
                        .unwrap_or_default(),
                ]
            }),
        )
    }

    fn load_budgets(&self) -> CoreResult<LoadReport<Budget>> {
        read_rows(
            &self.file_path(BUDGETS_FILE),
            &BUDGET_REQUIRED,
            parse_budget,
        )
    }

    fn save_budgets(&self, budgets: &[Budget]) -> CoreResult<()> {
        write_rows(
            &self.file_path(BUDGETS_FILE),
            &BUDGET_HEADER,
            budgets.iter().map(|budget| {
                vec![
                    budget.id.clone(),
                    budget.category.clone(),
                    format_amount(budget.amount),
                    budget.period.to_string(),
                ]
            }),
        )
    }
}

pub(crate) fn expense_row(expense: &Expense) -> Vec<String> {
    vec![
        expense.id.clone(),
        format_amount(expense.amount),
        expense.category.clone(),
        expense.date.format(DATE_FORMAT).to_string(),
        expense.description.clone(),
    ]
}

/// Amount cells must hold a finite, positive number.
fn parse_money(columns: &Columns, record: &StringRecord, name: &str) -> Result<f64, String> {
    let raw = columns.field(record, name);
    parse_amount(raw).map_err(|_| format!("invalid {} `{}`", name, raw))
}

fn required_text<'r>(
    columns: &Columns,
    record: &'r StringRecord,
    name: &str,
) -> Result<&'r str, String> {
    match columns.field(record, name) {
        "" => Err(format!("empty {}", name)),
        value => Ok(value),
    }
}

fn parse_day(columns: &Columns, record: &StringRecord, name: &str) -> Result<NaiveDate, String> {
    let raw = columns.field(record, name);
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| format!("invalid {} `{}`", name, raw))
}

pub(crate) fn parse_expense(columns: &Columns, record: &StringRecord) -> Result<Expense, String> {
    let amount = parse_money(columns, record, "amount")?;
    let category = required_text(columns, record, "category")?;
    let date = parse_day(columns, record, "date")?;
    Ok(Expense::with_id(
        columns.field(record, "id"),
        amount,
        category,
        date,
        columns.field(record, "description"),
    ))
}

fn parse_category(columns: &Columns, record: &StringRecord) -> Result<Category, String> {
    let name = columns.field(record, "name");
    if name.is_empty() {
        return Err("empty category name".to_string());
    }
    let mut category = Category::new(
        name,
        columns.field_or(record, "color", FALLBACK_COLOR),
        columns.field_or(record, "icon", FALLBACK_ICON),
    )
    .for_user(columns.field_or(record, "userId", DEFAULT_USER_ID));
    let id = columns.field(record, "id");
    if !id.is_empty() {
        category.id = id.to_string();
    }
    let parent = columns.field(record, "parentId");
    category.parent_id = (!parent.is_empty()).then(|| parent.to_string());
    Ok(category)
}

fn parse_recurring(
    columns: &Columns,
    record: &StringRecord,
) -> Result<RecurringExpense, String> {
    let amount = parse_money(columns, record, "amount")?;
    let category = required_text(columns, record, "category")?;
    let start_date = parse_day(columns, record, "startDate")?;
    let frequency = columns
        .field(record, "frequency")
        .parse::<Frequency>()
        .map_err(|err| format!("{}", err))?;
    let last_generated = match columns.field(record, "lastGenerated") {
        "" => None,
        _ => Some(parse_day(columns, record, "lastGenerated")?),
    };
    Ok(RecurringExpense::with_id(
        columns.field(record, "id"),
        amount,
        category,
        start_date,
        frequency,
        columns.field(record, "description"),
    )
    .with_last_generated(last_generated))
}

fn parse_budget(columns: &Columns, record: &StringRecord) -> Result<Budget, String> {
    let amount = parse_money(columns, record, "budgetAmount")?;
    let category = required_text(columns, record, "category")?;
    let period = columns
        .field(record, "period")
        .parse::<BudgetPeriod>()
        .map_err(|err| format!("{}", err))?;
    Ok(Budget::with_id(
        columns.field(record, "id"),
        category,
        amount,
        period,
    ))
}

pub(crate) fn csv_error(err: csv::Error) -> CoreError {
    CoreError::Csv(err.to_string())
}

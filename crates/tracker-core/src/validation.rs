//! Parsing and validation of user-entered record fields.

use chrono::NaiveDate;
use tracker_domain::{Budget, BudgetPeriod, Expense, Frequency, RecurringExpense};

use crate::{CoreError, CoreResult};

/// Parses a positive amount. Blank, non-numeric, non-finite and non-positive input is rejected.
pub fn parse_amount(raw: &str) -> CoreResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("Amount is required."));
    }
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::validation("Amount must be a valid number."))?;
    if !amount.is_finite() {
        return Err(CoreError::validation("Amount must be a valid number."));
    }
    if amount <= 0.0 {
        return Err(CoreError::validation("Amount must be positive."));
    }
    Ok(amount)
}

/// Parses a filter bound: any finite, non-negative number.
pub fn parse_amount_bound(raw: &str) -> CoreResult<f64> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(CoreError::validation(format!(
            "Amount bound must be a non-negative number, got `{}`.",
            trimmed
        ))),
    }
}

/// Whether `raw` starts like a `YYYY-` date, so it should not be read as free text.
pub fn looks_like_date(raw: &str) -> bool {
    let bytes = raw.trim().as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::validation(format!("Invalid date `{}`; expected YYYY-MM-DD.", raw.trim()))
    })
}

fn required<'a>(value: Option<&'a str>, field: &str) -> CoreResult<&'a str> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CoreError::validation(format!("{} is required.", field))),
    }
}

/// Rejects names that are empty after trimming and returns the trimmed name.
pub fn validate_category_name(name: &str) -> CoreResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("Category name cannot be empty."));
    }
    Ok(trimmed.to_string())
}

/// Raw expense form fields as entered by a user.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput<'a> {
    pub amount: Option<&'a str>,
    pub category: Option<&'a str>,
    pub date: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl ExpenseInput<'_> {
    /// Validates the fields and builds a new expense with a fresh identifier.
    pub fn into_expense(self) -> CoreResult<Expense> {
        let amount = parse_amount(required(self.amount, "Amount")?)?;
        let category = required(self.category, "Category")?;
        let date = parse_date(required(self.date, "Date")?)?;
        Ok(Expense::new(
            amount,
            category,
            date,
            self.description.unwrap_or("").trim(),
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetInput<'a> {
    pub category: Option<&'a str>,
    pub amount: Option<&'a str>,
    pub period: Option<&'a str>,
}

impl BudgetInput<'_> {
    pub fn into_budget(self) -> CoreResult<Budget> {
        let category = required(self.category, "Category")?;
        let amount = parse_amount(required(self.amount, "Budget amount")?)?;
        let period = required(self.period, "Period")?
            .parse::<BudgetPeriod>()
            .map_err(|err| CoreError::validation(format!("{}", err)))?;
        Ok(Budget::new(category, amount, period))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecurringInput<'a> {
    pub amount: Option<&'a str>,
    pub category: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub frequency: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl RecurringInput<'_> {
    pub fn into_template(self) -> CoreResult<RecurringExpense> {
        let amount = parse_amount(required(self.amount, "Amount")?)?;
        let category = required(self.category, "Category")?;
        let start_date = parse_date(required(self.start_date, "Start date")?)?;
        let frequency = required(self.frequency, "Frequency")?
            .parse::<Frequency>()
            .map_err(|err| CoreError::validation(format!("{}", err)))?;
        Ok(RecurringExpense::new(
            amount,
            category,
            start_date,
            frequency,
            self.description.unwrap_or("").trim(),
        ))
    }
}

//! Spending against budgets for the period window containing a reference date.

use chrono::NaiveDate;
use tracker_domain::{Budget, DateRange, Expense};

/// Progress of one budget within its current period window.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub window: DateRange,
    pub spent: f64,
    pub remaining: f64,
    pub exceeded: bool,
    pub percent_used: f64,
}

pub struct BudgetService;

impl BudgetService {
    /// Computes the status of `budget` for the window of its period containing `today`.
    ///
    /// Only expenses whose category equals the budget category exactly count.
    pub fn status(budget: &Budget, expenses: &[Expense], today: NaiveDate) -> BudgetStatus {
        let window = budget.period.window_containing(today);
        let spent: f64 = expenses
            .iter()
            .filter(|expense| expense.category == budget.category && window.contains(expense.date))
            .map(|expense| expense.amount)
            .sum();
        let percent_used = if budget.amount > 0.0 {
            spent / budget.amount * 100.0
        } else {
            0.0
        };
        BudgetStatus {
            budget: budget.clone(),
            window,
            spent,
            remaining: budget.amount - spent,
            exceeded: spent > budget.amount,
            percent_used,
        }
    }

    pub fn statuses(budgets: &[Budget], expenses: &[Expense], today: NaiveDate) -> Vec<BudgetStatus> {
        budgets
            .iter()
            .map(|budget| Self::status(budget, expenses, today))
            .collect()
    }
}

//! Spending limits attached to a category name.

use serde::{Deserialize, Serialize};

use crate::common::*;

/// A spending ceiling for one category over a recurring period.
///
/// Several budgets may target the same (category, period) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn new(category: impl Into<String>, amount: f64, period: BudgetPeriod) -> Self {
        Self::with_id(new_id(), category, amount, period)
    }

    pub fn with_id(
        id: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        period: BudgetPeriod,
    ) -> Self {
        Self {
            id: id_or_generate(id),
            category: category.into(),
            amount,
            period,
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}


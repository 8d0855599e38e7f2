//! Domain model for individual expense records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// A single spending entry. Records are replaced wholesale on update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Expense {
    pub fn new(
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self::with_id(new_id(), amount, category, date, description)
    }

    /// Builds an expense with a caller-supplied identifier, generating one when blank.
    pub fn with_id(
        id: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id_or_generate(id),
            amount,
            category: category.into(),
            date,
            description: description.into(),
        }
    }

    /// Amount rendered the way it is persisted and searched.
    pub fn amount_label(&self) -> String {
        format_amount(self.amount)
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_id_is_replaced() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let expense = Expense::with_id("", 12.5, "Food", date, "Lunch");
        assert!(!expense.id.is_empty());
        assert_eq!(expense.amount_label(), "12.50");
    }

    #[test]
    fn missing_description_deserializes_to_empty() {
        let json = r#"{"id":"a","amount":5.0,"category":"Food","date":"2024-01-02"}"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.description, "");
    }
}

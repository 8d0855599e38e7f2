//! Derived reporting rows. Rebuilt on every request and never persisted.

use serde::{Deserialize, Serialize};

/// Spending total for one category and its share of the grand total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryReportData {
    pub category_name: String,
    pub total_amount: f64,
    /// Share of the grand total, in percent (0 to 100).
    pub percentage: f64,
}

/// Aggregated view over an expense collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryReport {
    pub grand_total: f64,
    pub rows: Vec<CategoryReportData>,
}

impl CategoryReport {
    pub fn row(&self, category: &str) -> Option<&CategoryReportData> {
        self.rows.iter().find(|row| row.category_name == category)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//! Category breakdowns over expense collections.

use tracker_domain::{CategoryReport, CategoryReportData, Expense};

pub struct ReportService;

impl ReportService {
    /// Groups `expenses` by raw category string.
    ///
    /// Rows keep first-appearance order. Percentages are shares of the grand
    /// total, or all zero when the total is zero.
    pub fn summarize(expenses: &[Expense]) -> CategoryReport {
        let mut rows: Vec<CategoryReportData> = Vec::new();
        let mut grand_total = 0.0;
        for expense in expenses {
            grand_total += expense.amount;
            match rows
                .iter_mut()
                .find(|row| row.category_name == expense.category)
            {
                Some(row) => row.total_amount += expense.amount,
                None => rows.push(CategoryReportData {
                    category_name: expense.category.clone(),
                    total_amount: expense.amount,
                    percentage: 0.0,
                }),
            }
        }
        if grand_total > 0.0 {
            for row in &mut rows {
                row.percentage = row.total_amount / grand_total * 100.0;
            }
        }
        CategoryReport { grand_total, rows }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn expense(amount: f64, category: &str, day: u32) -> Expense {
        Expense::new(
            amount,
            category,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            "",
        )
    }

    #[test]
    fn empty_input_reports_zero() {
        let report = ReportService::summarize(&[]);
        assert_eq!(report.grand_total, 0.0);
        assert!(report.is_empty());
    }

    #[test]
    fn rows_follow_first_appearance() {
        let report = ReportService::summarize(&[
            expense(1.0, "Transport", 1),
            expense(2.0, "Food", 2),
            expense(3.0, "Transport", 3),
        ]);
        let names: Vec<_> = report.rows.iter().map(|r| r.category_name.as_str()).collect();
        assert_eq!(names, ["Transport", "Food"]);
    }

    #[test]
    fn category_strings_are_case_sensitive() {
        let report = ReportService::summarize(&[expense(1.0, "food", 1), expense(1.0, "Food", 2)]);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.row("food").unwrap().percentage, 50.0);
    }
}

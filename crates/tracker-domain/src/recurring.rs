//! Recurring expense templates and their occurrence schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{common::*, expense::Expense};

/// Template describing an expense that repeats on a fixed cadence.
///
/// `last_generated` is the watermark of the most recent occurrence that has been
/// turned into a concrete [`Expense`]; occurrences on or before it are never
/// generated again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringExpense {
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_generated: Option<NaiveDate>,
}

impl RecurringExpense {
    pub fn new(
        amount: f64,
        category: impl Into<String>,
        start_date: NaiveDate,
        frequency: Frequency,
        description: impl Into<String>,
    ) -> Self {
        Self::with_id(new_id(), amount, category, start_date, frequency, description)
    }

    pub fn with_id(
        id: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        start_date: NaiveDate,
        frequency: Frequency,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id_or_generate(id),
            amount,
            category: category.into(),
            start_date,
            frequency,
            description: description.into(),
            last_generated: None,
        }
    }

    /// Returns a copy carrying the given generation watermark.
    pub fn with_last_generated(mut self, date: Option<NaiveDate>) -> Self {
        self.last_generated = date;
        self
    }

    pub fn occurrence(&self, index: u32) -> Option<NaiveDate> {
        self.frequency.nth_occurrence(self.start_date, index)
    }

    fn is_pending(&self, date: NaiveDate) -> bool {
        self.last_generated.map_or(true, |mark| date > mark)
    }

    /// Occurrences after the watermark that fall on or before `today`, oldest first,
    /// at most `limit` of them.
    pub fn due_occurrences(&self, today: NaiveDate, limit: usize) -> Vec<NaiveDate> {
        let mut due = Vec::new();
        let mut index = 0u32;
        while due.len() < limit {
            let Some(date) = self.occurrence(index) else {
                break;
            };
            if date > today {
                break;
            }
            if self.is_pending(date) {
                due.push(date);
            }
            let Some(next) = index.checked_add(1) else {
                break;
            };
            index = next;
        }
        due
    }

    /// First occurrence that has not been generated yet.
    pub fn next_due(&self) -> Option<NaiveDate> {
        let mut index = 0u32;
        loop {
            let date = self.occurrence(index)?;
            if self.is_pending(date) {
                return Some(date);
            }
            index = index.checked_add(1)?;
        }
    }

    /// Materializes the template as a concrete expense dated `date`.
    pub fn to_expense(&self, date: NaiveDate) -> Expense {
        Expense::new(
            self.amount,
            self.category.clone(),
            date,
            self.description.clone(),
        )
    }
}

impl Identifiable for RecurringExpense {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent() -> RecurringExpense {
        RecurringExpense::new(500.0, "Housing", date(2024, 1, 5), Frequency::Monthly, "Rent")
    }

    #[test]
    fn due_occurrences_without_watermark_start_at_anchor() {
        let due = rent().due_occurrences(date(2024, 3, 10), 100);
        assert_eq!(due, vec![date(2024, 1, 5), date(2024, 2, 5), date(2024, 3, 5)]);
    }

    #[test]
    fn watermark_excludes_generated_occurrences() {
        let template = rent().with_last_generated(Some(date(2024, 2, 5)));
        let due = template.due_occurrences(date(2024, 4, 5), 100);
        assert_eq!(due, vec![date(2024, 3, 5), date(2024, 4, 5)]);
        assert_eq!(template.next_due(), Some(date(2024, 3, 5)));
    }

    #[test]
    fn future_start_has_nothing_due() {
        let template = rent();
        assert!(template.due_occurrences(date(2024, 1, 4), 100).is_empty());
        assert_eq!(template.next_due(), Some(date(2024, 1, 5)));
    }

    #[test]
    fn limit_bounds_generation() {
        let template =
            RecurringExpense::new(1.0, "Coffee", date(2024, 1, 1), Frequency::Daily, "");
        let due = template.due_occurrences(date(2024, 12, 31), 10);
        assert_eq!(due.len(), 10);
        assert_eq!(due.last(), Some(&date(2024, 1, 10)));
    }

    #[test]
    fn watermark_beyond_today_yields_nothing() {
        let template = rent().with_last_generated(Some(date(2024, 6, 5)));
        assert!(template.due_occurrences(date(2024, 3, 1), 100).is_empty());
    }
}

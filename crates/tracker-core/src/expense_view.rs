//! Filtered and sorted projection over the expense collection.

use std::{cmp::Ordering, fmt, str::FromStr, sync::Arc};

use chrono::NaiveDate;
use tracker_domain::{Expense, ParseEnumError, ALL_CATEGORIES};

use crate::RecordStore;

/// Independent predicates combined with AND. Unset criteria always pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub search_text: Option<String>,
}

impl FilterCriteria {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_dates(expense)
            && self.matches_category(expense)
            && self.matches_amount(expense)
            && self.matches_search(expense)
    }

    fn matches_dates(&self, expense: &Expense) -> bool {
        self.start_date.map_or(true, |start| expense.date >= start)
            && self.end_date.map_or(true, |end| expense.date <= end)
    }

    fn matches_category(&self, expense: &Expense) -> bool {
        match self.category.as_deref() {
            None | Some("") | Some(ALL_CATEGORIES) => true,
            Some(category) => expense.category == category,
        }
    }

    fn matches_amount(&self, expense: &Expense) -> bool {
        self.min_amount.map_or(true, |min| expense.amount >= min)
            && self.max_amount.map_or(true, |max| expense.amount <= max)
    }

    fn matches_search(&self, expense: &Expense) -> bool {
        let needle = match self.search_text.as_deref() {
            None | Some("") => return true,
            Some(text) => text.to_lowercase(),
        };
        expense.description.to_lowercase().contains(&needle)
            || expense.category.to_lowercase().contains(&needle)
            || expense.amount_label().contains(&needle)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Amount,
    Category,
    Date,
    Description,
}

impl SortColumn {
    fn compare(self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            SortColumn::Amount => a.amount.total_cmp(&b.amount),
            SortColumn::Category => a.category.cmp(&b.category),
            SortColumn::Date => a.date.cmp(&b.date),
            SortColumn::Description => a.description.cmp(&b.description),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortColumn::Amount => "amount",
            SortColumn::Category => "category",
            SortColumn::Date => "date",
            SortColumn::Description => "description",
        };
        f.write_str(label)
    }
}

impl FromStr for SortColumn {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "amount" => Ok(SortColumn::Amount),
            "category" => Ok(SortColumn::Category),
            "date" => Ok(SortColumn::Date),
            "description" => Ok(SortColumn::Description),
            _ => Err(ParseEnumError {
                kind: "sort column",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(ParseEnumError {
                kind: "sort direction",
                value: value.to_string(),
            }),
        }
    }
}

pub type ExpenseComparator = Arc<dyn Fn(&Expense, &Expense) -> Ordering + Send + Sync>;

/// Ordering applied to the projected rows.
#[derive(Clone)]
pub enum Comparator {
    Column(SortColumn, SortDirection),
    Custom(ExpenseComparator),
}

impl Comparator {
    fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            Comparator::Column(column, SortDirection::Ascending) => column.compare(a, b),
            Comparator::Column(column, SortDirection::Descending) => column.compare(b, a),
            Comparator::Custom(compare) => compare(a, b),
        }
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Column(column, direction) => f
                .debug_tuple("Column")
                .field(column)
                .field(direction)
                .finish(),
            Comparator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Read-only projection of an expense store.
///
/// Changing a criterion or the comparator marks the view stale, as does a new
/// store revision. [`ExpenseView::refresh`] recomputes when stale.
#[derive(Debug, Default)]
pub struct ExpenseView {
    criteria: FilterCriteria,
    comparator: Option<Comparator>,
    rows: Vec<Expense>,
    seen_revision: Option<u64>,
}

impl ExpenseView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.criteria.start_date = start;
        self.criteria.end_date = end;
        self.invalidate();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.criteria.category = category;
        self.invalidate();
    }

    pub fn set_amount_range(&mut self, min: Option<f64>, max: Option<f64>) {
        self.criteria.min_amount = min;
        self.criteria.max_amount = max;
        self.invalidate();
    }

    pub fn set_search_text(&mut self, text: Option<String>) {
        self.criteria.search_text = text;
        self.invalidate();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.invalidate();
    }

    pub fn set_comparator(&mut self, comparator: Option<Comparator>) {
        self.comparator = comparator;
        self.invalidate();
    }

    pub fn is_stale(&self, store: &RecordStore<Expense>) -> bool {
        self.seen_revision != Some(store.revision())
    }

    /// Brings the projection up to date with `store` and returns the rows.
    pub fn refresh(&mut self, store: &RecordStore<Expense>) -> &[Expense] {
        if self.is_stale(store) {
            self.recompute(store.records());
            self.seen_revision = Some(store.revision());
        }
        &self.rows
    }

    /// Rebuilds the rows from `records`: filter, then stable sort.
    pub fn recompute(&mut self, records: &[Expense]) {
        self.rows = records
            .iter()
            .filter(|expense| self.criteria.matches(expense))
            .cloned()
            .collect();
        if let Some(comparator) = &self.comparator {
            self.rows.sort_by(|a, b| comparator.compare(a, b));
        }
    }

    /// Rows as of the last refresh.
    pub fn rows(&self) -> &[Expense] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Expense> {
        self.rows.get(index)
    }

    /// Sum of the projected amounts.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|expense| expense.amount).sum()
    }

    fn invalidate(&mut self) {
        self.seen_revision = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Expense> {
        vec![
            Expense::new(10.0, "Food", date(2024, 1, 1), "Groceries for school"),
            Expense::new(20.0, "Food", date(2024, 1, 15), "Dinner"),
            Expense::new(5.0, "Transport", date(2024, 1, 10), "Bus"),
        ]
    }

    #[test]
    fn sentinel_category_disables_filter() {
        let records = sample();
        let expense = &records[0];
        for category in [None, Some(String::new()), Some(ALL_CATEGORIES.to_string())] {
            let criteria = FilterCriteria {
                category,
                ..Default::default()
            };
            assert!(criteria.matches(expense));
        }
    }

    #[test]
    fn search_matches_formatted_amount() {
        let criteria = FilterCriteria {
            search_text: Some("20.00".into()),
            ..Default::default()
        };
        let hits: Vec<_> = sample().into_iter().filter(|e| criteria.matches(e)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Dinner");
    }

    #[test]
    fn search_is_case_insensitive() {
        let criteria = FilterCriteria {
            search_text: Some("GROCER".into()),
            ..Default::default()
        };
        assert!(criteria.matches(&sample()[0]));
    }

    #[test]
    fn descending_amount_sort_is_stable() {
        let mut view = ExpenseView::new();
        let mut records = sample();
        records.push(Expense::new(20.0, "Misc", date(2024, 1, 2), "Second twenty"));
        view.set_comparator(Some(Comparator::Column(
            SortColumn::Amount,
            SortDirection::Descending,
        )));
        view.recompute(&records);

        let descriptions: Vec<_> = view.rows().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, ["Dinner", "Second twenty", "Groceries for school", "Bus"]);
    }

    #[test]
    fn custom_comparator_orders_rows() {
        let mut view = ExpenseView::new();
        view.set_comparator(Some(Comparator::Custom(Arc::new(|a: &Expense, b: &Expense| {
            b.date.cmp(&a.date)
        }))));
        view.recompute(&sample());
        assert_eq!(view.rows()[0].date, date(2024, 1, 15));
        assert_eq!(view.total(), 35.0);
    }

    #[test]
    fn parses_sort_arguments() {
        assert_eq!("Amount".parse::<SortColumn>(), Ok(SortColumn::Amount));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Descending));
        assert!("size".parse::<SortColumn>().is_err());
    }
}

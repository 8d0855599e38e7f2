//! Shared traits, enums, and date helpers for expense-tracking primitives.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User identifier stamped on categories until real multi-tenancy exists.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Category filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All Categories";

/// Exposes the opaque identifier of a persisted record.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Generates a fresh opaque identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns `candidate` unless it is blank, in which case a new identifier is generated.
pub fn id_or_generate(candidate: impl Into<String>) -> String {
    let candidate = candidate.into();
    if candidate.trim().is_empty() {
        new_id()
    } else {
        candidate
    }
}

/// Formats an amount with exactly two fractional digits.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when an enumerated value cannot be parsed from text.
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
/// Cadence at which a recurring template produces expenses.
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Returns the `n`-th occurrence counted from `start` (occurrence 0 is `start`).
    ///
    /// Month and year steps are computed from the anchor rather than chained, so a
    /// template anchored on the 31st lands on the 31st whenever the month allows it.
    pub fn nth_occurrence(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => start.checked_add_days(Days::new(u64::from(n))),
            Frequency::Weekly => start.checked_add_days(Days::new(u64::from(n) * 7)),
            Frequency::Monthly => start.checked_add_months(Months::new(n)),
            Frequency::Yearly => n
                .checked_mul(12)
                .and_then(|months| start.checked_add_months(Months::new(months))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            _ => Err(ParseEnumError {
                kind: "frequency",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
/// Enumerates the budgeting cadences a budget can be tracked against.
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub const ALL: [BudgetPeriod; 3] = [
        BudgetPeriod::Weekly,
        BudgetPeriod::Monthly,
        BudgetPeriod::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "WEEKLY",
            BudgetPeriod::Monthly => "MONTHLY",
            BudgetPeriod::Yearly => "YEARLY",
        }
    }

    /// Returns the calendar window of this period that contains `date`.
    ///
    /// Weeks start on Monday; months and years follow the calendar.
    pub fn window_containing(self, date: NaiveDate) -> DateRange {
        match self {
            BudgetPeriod::Weekly => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                let start = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(date);
                DateRange { start, end }
            }
            BudgetPeriod::Monthly => {
                let start = date.with_day(1).unwrap_or(date);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(date);
                DateRange { start, end }
            }
            BudgetPeriod::Yearly => {
                let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
                let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
                DateRange { start, end }
            }
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "WEEKLY" => Ok(BudgetPeriod::Weekly),
            "MONTHLY" => Ok(BudgetPeriod::Monthly),
            "YEARLY" => Ok(BudgetPeriod::Yearly),
            _ => Err(ParseEnumError {
                kind: "budget period",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Inclusive calendar date range.
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_occurrences_do_not_drift_after_short_months() {
        let start = date(2024, 1, 31);
        assert_eq!(Frequency::Monthly.nth_occurrence(start, 1), Some(date(2024, 2, 29)));
        assert_eq!(Frequency::Monthly.nth_occurrence(start, 2), Some(date(2024, 3, 31)));
    }

    #[test]
    fn yearly_occurrence_clamps_leap_day() {
        let start = date(2024, 2, 29);
        assert_eq!(Frequency::Yearly.nth_occurrence(start, 1), Some(date(2025, 2, 28)));
        assert_eq!(Frequency::Yearly.nth_occurrence(start, 4), Some(date(2028, 2, 29)));
    }

    #[test]
    fn weekly_and_daily_steps() {
        let start = date(2024, 1, 1);
        assert_eq!(Frequency::Daily.nth_occurrence(start, 3), Some(date(2024, 1, 4)));
        assert_eq!(Frequency::Weekly.nth_occurrence(start, 2), Some(date(2024, 1, 15)));
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("monthly".parse::<Frequency>(), Ok(Frequency::Monthly));
        assert_eq!(" Weekly ".parse::<BudgetPeriod>(), Ok(BudgetPeriod::Weekly));
        assert!("fortnightly".parse::<Frequency>().is_err());
        assert!("DAILY".parse::<BudgetPeriod>().is_err());
    }

    #[test]
    fn budget_windows_follow_calendar() {
        let wednesday = date(2024, 1, 17);
        let week = BudgetPeriod::Weekly.window_containing(wednesday);
        assert_eq!(week.start, date(2024, 1, 15));
        assert_eq!(week.end, date(2024, 1, 21));

        let month = BudgetPeriod::Monthly.window_containing(date(2024, 2, 10));
        assert_eq!(month.start, date(2024, 2, 1));
        assert_eq!(month.end, date(2024, 2, 29));

        let year = BudgetPeriod::Yearly.window_containing(wednesday);
        assert!(year.contains(date(2024, 12, 31)));
        assert!(!year.contains(date(2025, 1, 1)));
    }

    #[test]
    fn blank_identifiers_are_generated() {
        assert_eq!(id_or_generate("abc"), "abc");
        assert!(!id_or_generate("  ").trim().is_empty());
    }

    #[test]
    fn amounts_use_two_decimals() {
        assert_eq!(format_amount(10.0), "10.00");
        assert_eq!(format_amount(3.456), "3.46");
    }
}

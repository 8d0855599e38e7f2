use std::{fmt::Write, path::PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_DIR_NAME: &str = ".expense_tracker";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// User-configurable preferences for the tracker shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Label printed in front of amounts, e.g. `K 12.00`.
    #[serde(default = "Config::default_currency_label")]
    pub currency_label: String,
    #[serde(default = "Config::default_user_id")]
    pub default_user_id: String,
    /// `chrono` format used when displaying dates.
    #[serde(default = "Config::default_date_format")]
    pub date_format: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the CSV data files. Defaults to `~/.expense_tracker`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_label: Self::default_currency_label(),
            default_user_id: Self::default_user_id(),
            date_format: Self::default_date_format(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_currency_label() -> String {
        "K".into()
    }

    pub fn default_user_id() -> String {
        "default_user".into()
    }

    pub fn default_date_format() -> String {
        DEFAULT_DATE_FORMAT.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DATA_DIR_NAME)
    }

    /// Formats `amount` with the currency label and two decimals.
    pub fn format_money(&self, amount: f64) -> String {
        format!("{} {:.2}", self.currency_label, amount)
    }

    /// Formats `date` with the configured pattern, or ISO-8601 when the pattern
    /// cannot render a calendar date.
    pub fn format_date(&self, date: NaiveDate) -> String {
        try_format(date, &self.date_format)
            .unwrap_or_else(|| date.format(DEFAULT_DATE_FORMAT).to_string())
    }

    /// Replaces an unusable `date_format` with the default. Returns whether it was replaced.
    pub fn repair_date_format(&mut self) -> bool {
        if is_usable_date_format(&self.date_format) {
            return false;
        }
        self.date_format = Self::default_date_format();
        true
    }
}

/// Whether `format` is a strftime pattern that renders a plain calendar date.
pub fn is_usable_date_format(format: &str) -> bool {
    NaiveDate::from_ymd_opt(2000, 1, 1).map_or(false, |sample| try_format(sample, format).is_some())
}

fn try_format(date: NaiveDate, format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(format)).ok()?;
    Some(rendered)
}

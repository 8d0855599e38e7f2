use std::{path::Path, sync::Arc};

use chrono::NaiveDate;
use expense_tracker::Tracker;
use tempfile::TempDir;
use tracker_config::Config;
use tracker_core::FixedClock;
use tracker_storage_csv::CsvStorage;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Opens a CSV-backed tracker in `dir` with a pinned calendar date.
pub fn open_tracker(dir: &Path, today: NaiveDate) -> Tracker {
    Tracker::open(
        Arc::new(CsvStorage::new(dir)),
        Arc::new(FixedClock::new(today)),
        Config::default(),
    )
}

pub fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

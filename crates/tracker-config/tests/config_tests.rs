use std::fs;

use chrono::NaiveDate;
use tracker_config::{is_usable_date_format, Config, ConfigError, ConfigManager, DEFAULT_DATE_FORMAT};
use tempfile::tempdir;

#[test]
fn defaults_use_kwacha_label_and_iso_dates() {
    let cfg = Config::default();

    assert_eq!(cfg.currency_label, "K");
    assert_eq!(cfg.default_user_id, "default_user");
    assert_eq!(cfg.date_format, "%Y-%m-%d");
    assert_eq!(cfg.format_money(12.5), "K 12.50");
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.currency_label = "ZMW".to_string();
    cfg.data_dir = Some(dir.path().join("data"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_data_dir(), dir.path().join("data"));
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "currency_label": "$" }"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.currency_label, "$");
    assert_eq!(loaded.date_format, "%Y-%m-%d");
    assert!(loaded.ui_color_enabled);
}

#[test]
fn malformed_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "not json").expect("write");

    let err = ConfigManager::new(path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}

#[test]
fn invalid_date_format_falls_back_to_iso() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "date_format": "%Q" }"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.date_format, "%Y-%m-%d");
}

#[test]
fn format_date_never_panics_on_bad_patterns() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("date");
    let mut cfg = Config::default();
    assert_eq!(cfg.format_date(date), "2024-01-05");

    cfg.date_format = "%d/%m/%Y".to_string();
    assert_eq!(cfg.format_date(date), "05/01/2024");
    assert!(!cfg.repair_date_format());

    for pattern in ["%Q", "%H:%M"] {
        cfg.date_format = pattern.to_string();
        assert!(!is_usable_date_format(pattern));
        assert_eq!(cfg.format_date(date), "2024-01-05");
    }
    assert!(cfg.repair_date_format());
    assert_eq!(cfg.date_format, DEFAULT_DATE_FORMAT);
}

//! tracker-config
//!
//! Persistent user preferences for the expense tracker.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{is_usable_date_format, Config, DEFAULT_DATE_FORMAT};

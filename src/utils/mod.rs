use std::{env, path::PathBuf, sync::Once};

use dirs::home_dir;
use tracker_config::Config;

pub const HOME_ENV: &str = "EXPENSE_TRACKER_HOME";
const DEFAULT_DIR_NAME: &str = ".expense_tracker";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` overrides the default `expense_tracker=info` directive.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "expense_tracker=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Directory holding `config.json`, defaulting to `~/.expense_tracker`.
pub fn app_home_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the CSV data files.
///
/// `EXPENSE_TRACKER_HOME` wins, then the configured directory, then `~/.expense_tracker`.
pub fn data_dir(config: &Config) -> PathBuf {
    match env::var_os(HOME_ENV) {
        Some(custom) => PathBuf::from(custom),
        None => config.resolve_data_dir(),
    }
}

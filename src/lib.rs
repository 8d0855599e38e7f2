//! Expense Tracker records expenses, recurring templates, budgets and
//! categories in flat CSV files and reports on them from a command shell.

pub mod app;
pub mod cli;
pub mod errors;
pub mod utils;

pub use app::{StartupSummary, Tracker};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("expense tracker tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

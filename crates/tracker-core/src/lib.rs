//! tracker-core
//!
//! Record stores, projections and services for the expense tracker.
//! Depends on tracker-domain. No CLI, no terminal I/O; persistence goes through
//! the [`PersistenceAdapter`] trait.

pub mod budget_service;
pub mod category_service;
pub mod error;
pub mod expense_view;
pub mod recurrence_service;
pub mod record_store;
pub mod report_service;
pub mod storage;
pub mod time;
pub mod validation;

pub use budget_service::*;
pub use category_service::*;
pub use error::{CoreError, CoreResult};
pub use expense_view::*;
pub use recurrence_service::*;
pub use record_store::*;
pub use report_service::*;
pub use storage::*;
pub use time::*;
pub use validation::*;

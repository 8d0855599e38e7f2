//! tracker-domain
//!
//! Pure domain models (Expense, Category, Budget, RecurringExpense, reports).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod budget;
pub mod category;
pub mod common;
pub mod expense;
pub mod recurring;
pub mod report;

pub use budget::*;
pub use category::*;
pub use common::*;
pub use expense::*;
pub use recurring::*;
pub use report::*;

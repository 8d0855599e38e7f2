//! Bulk import and export of expenses in the persisted CSV layout.

use std::{fs::File, path::Path};

use tracing::{info, warn};
use tracker_core::{CoreResult, LoadReport};
use tracker_domain::Expense;

use crate::{
    columns::{read_from, write_rows},
    expense_row, parse_expense, EXPENSE_HEADER, EXPENSE_REQUIRED,
};

/// Expenses read from an import file plus one warning per skipped row.
pub type ImportReport = LoadReport<Expense>;

/// Reads expenses from `path` using the `{id, amount, category, date, description}` layout.
///
/// Blank identifiers are generated. Rows with malformed amounts or dates are
/// skipped and reported. A missing `amount`, `category` or `date` column
/// aborts the import.
pub fn import_expenses(path: &Path) -> CoreResult<ImportReport> {
    let file = File::open(path)?;
    let report = read_from(file, path, &EXPENSE_REQUIRED, parse_expense)?;
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    info!(
        path = %path.display(),
        imported = report.records.len(),
        skipped = report.warnings.len(),
        "expenses imported"
    );
    Ok(report)
}

/// Writes `expenses` to `path` in the same layout accepted by [`import_expenses`].
pub fn export_expenses(path: &Path, expenses: &[Expense]) -> CoreResult<()> {
    write_rows(path, &EXPENSE_HEADER, expenses.iter().map(expense_row))?;
    info!(path = %path.display(), exported = expenses.len(), "expenses exported");
    Ok(())
}

//! Materializes concrete expenses from recurring templates.

use chrono::NaiveDate;
use tracing::{info, warn};
use tracker_domain::{Expense, RecurringExpense};

use crate::{CoreResult, RecordStore};

/// Maximum number of expenses a single generation run may materialize.
pub const MAX_GENERATED_PER_RUN: usize = 1024;

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOutcome {
    pub generated: Vec<Expense>,
    pub templates_advanced: usize,
    /// Set when the run stopped at [`MAX_GENERATED_PER_RUN`]; a later run continues.
    pub capped: bool,
}

pub struct RecurrenceService;

impl RecurrenceService {
    /// Generates one expense per due occurrence of every template and advances
    /// each template's watermark to its last generated occurrence.
    ///
    /// Expenses are saved in one write, then templates in another. When the
    /// expense save fails the advanced watermarks stay in memory only, so a
    /// later session regenerates the lost occurrences.
    pub fn generate_due_expenses(
        templates: &mut RecordStore<RecurringExpense>,
        expenses: &mut RecordStore<Expense>,
        today: NaiveDate,
    ) -> CoreResult<GenerationOutcome> {
        let mut outcome = GenerationOutcome::default();
        let mut advanced = Vec::new();

        for template in templates.records() {
            let remaining = MAX_GENERATED_PER_RUN - outcome.generated.len();
            if remaining == 0 {
                outcome.capped = true;
                break;
            }
            let due = template.due_occurrences(today, remaining);
            let Some(&last) = due.last() else {
                continue;
            };
            let updated = template.clone().with_last_generated(Some(last));
            if due.len() == remaining && updated.next_due().is_some_and(|next| next <= today) {
                outcome.capped = true;
            }
            outcome
                .generated
                .extend(due.iter().map(|&date| template.to_expense(date)));
            advanced.push((template.clone(), updated));
        }

        if outcome.generated.is_empty() {
            return Ok(outcome);
        }
        if outcome.capped {
            warn!(
                limit = MAX_GENERATED_PER_RUN,
                "recurring generation capped; remaining occurrences deferred"
            );
        }

        outcome.templates_advanced = advanced.len();
        if let Err(err) = expenses.extend(outcome.generated.iter().cloned()) {
            templates.replace_unsaved(advanced);
            warn!("generated expenses not saved; watermarks left unsaved");
            return Err(err);
        }
        templates.update_all(advanced)?;
        info!(
            generated = outcome.generated.len(),
            "recurring expenses materialized"
        );
        Ok(outcome)
    }

    /// Next occurrence that has not been generated yet.
    pub fn next_due(template: &RecurringExpense) -> Option<NaiveDate> {
        template.next_due()
    }
}

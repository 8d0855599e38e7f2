//! Composition root tying stores, projections and services together.

use std::{path::Path, sync::Arc};

use chrono::NaiveDate;
use tracing::{error, info};
use tracker_config::Config;
use tracker_core::{
    BudgetInput, BudgetService, BudgetStatus, CategoryService, Clock, ExpenseInput, ExpenseView,
    GenerationOutcome, Persisted, PersistenceAdapter, RecordStore, RecurrenceService,
    RecurringInput, ReportService,
};
use tracker_domain::{
    Budget, Category, CategoryArena, CategoryReport, Expense, Identifiable, RecurringExpense,
};
use tracker_storage_csv::{export_expenses, import_expenses, ImportReport};

use crate::errors::{Result, TrackerError};

/// What happened while opening the tracker.
#[derive(Debug, Default)]
pub struct StartupSummary {
    pub defaults_created: usize,
    pub generated: usize,
    pub errors: Vec<String>,
}

/// Owns every record store plus the expense view for one data directory.
pub struct Tracker {
    expenses: RecordStore<Expense>,
    categories: RecordStore<Category>,
    budgets: RecordStore<Budget>,
    recurring: RecordStore<RecurringExpense>,
    view: ExpenseView,
    clock: Arc<dyn Clock>,
    config: Config,
    startup: StartupSummary,
}

impl Tracker {
    /// Loads all collections, seeds default categories and materializes due
    /// recurring expenses.
    ///
    /// Startup failures are logged and kept in [`Tracker::startup`]; the
    /// tracker is usable with whatever state is in memory. Defaults are not
    /// seeded over a category file that failed to load.
    pub fn open(adapter: Arc<dyn PersistenceAdapter>, clock: Arc<dyn Clock>, config: Config) -> Self {
        let mut tracker = Self {
            expenses: RecordStore::load(adapter.clone()),
            categories: RecordStore::load(adapter.clone()),
            budgets: RecordStore::load(adapter.clone()),
            recurring: RecordStore::load(adapter),
            view: ExpenseView::new(),
            clock,
            config,
            startup: StartupSummary::default(),
        };

        let load_errors = [
            tracker.expenses.load_error().map(|err| ("expenses", err)),
            tracker.categories.load_error().map(|err| ("categories", err)),
            tracker.budgets.load_error().map(|err| ("budgets", err)),
            tracker.recurring.load_error().map(|err| ("recurring expenses", err)),
        ];
        for (kind, err) in load_errors.into_iter().flatten() {
            tracker
                .startup
                .errors
                .push(format!("Could not load {}: {}", kind, err));
        }

        if !tracker.categories.load_failed() {
            match CategoryService::bootstrap_defaults(
                &mut tracker.categories,
                &tracker.config.default_user_id,
            ) {
                Ok(count) => tracker.startup.defaults_created = count,
                Err(err) => {
                    error!(error = %err, "failed to seed default categories");
                    tracker.startup.errors.push(err.to_string());
                }
            }
        }
        match tracker.generate_due() {
            Ok(outcome) => tracker.startup.generated = outcome.generated.len(),
            Err(err) => tracker.startup.errors.push(err.to_string()),
        }
        info!(
            expenses = tracker.expenses.len(),
            categories = tracker.categories.len(),
            "tracker opened"
        );
        tracker
    }

    pub fn startup(&self) -> &StartupSummary {
        &self.startup
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.expenses.records()
    }

    pub fn view(&self) -> &ExpenseView {
        &self.view
    }

    /// Mutable access for changing filter criteria and the comparator.
    pub fn view_mut(&mut self) -> &mut ExpenseView {
        &mut self.view
    }

    /// Current rows of the expense view, recomputed when stale.
    pub fn rows(&mut self) -> &[Expense] {
        self.view.refresh(&self.expenses)
    }

    /// Total of the current view rows.
    pub fn total_spent(&mut self) -> f64 {
        self.view.refresh(&self.expenses);
        self.view.total()
    }

    fn row(&mut self, index: usize) -> Result<Expense> {
        self.rows()
            .get(index)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(format!("no expense at row {}", index + 1)))
    }

    pub fn add_expense(&mut self, input: ExpenseInput<'_>) -> Result<Expense> {
        let expense = input.into_expense()?;
        self.expenses.add(expense.clone())?;
        Ok(expense)
    }

    /// Replaces the expense shown at `index` in the view, keeping its identifier.
    pub fn edit_expense(&mut self, index: usize, input: ExpenseInput<'_>) -> Result<Expense> {
        let current = self.row(index)?;
        let validated = input.into_expense()?;
        let updated = Expense::with_id(
            current.id.clone(),
            validated.amount,
            validated.category,
            validated.date,
            validated.description,
        );
        if !self.expenses.update(&current, updated.clone())? {
            return Err(TrackerError::NotFound(format!("expense {}", current.id)));
        }
        Ok(updated)
    }

    /// Deletes the expense shown at `index` in the view.
    pub fn delete_expense(&mut self, index: usize) -> Result<Expense> {
        let current = self.row(index)?;
        if !self.expenses.delete(&current)? {
            return Err(TrackerError::NotFound(format!("expense {}", current.id)));
        }
        Ok(current)
    }

    /// Category breakdown of the current view rows.
    pub fn report(&mut self) -> CategoryReport {
        ReportService::summarize(self.rows())
    }

    pub fn categories(&self) -> &[Category] {
        self.categories.records()
    }

    pub fn category_arena(&self) -> CategoryArena {
        CategoryService::arena(&self.categories)
    }

    pub fn add_category(&mut self, name: &str) -> Result<Category> {
        let user_id = self.config.default_user_id.clone();
        Ok(CategoryService::add(&mut self.categories, name, &user_id)?)
    }

    /// Renames a category. Expenses keep the category string they were recorded with.
    pub fn rename_category(&mut self, name: &str, new_name: &str) -> Result<Category> {
        let id = CategoryService::find_by_name(&self.categories, name)?.id.clone();
        if !CategoryService::rename(&mut self.categories, &id, new_name)? {
            return Err(TrackerError::NotFound(format!("category `{}`", name)));
        }
        self.categories
            .find(&id)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(format!("category `{}`", name)))
    }

    /// Deletes a category; its subcategories become top-level categories.
    pub fn delete_category(&mut self, name: &str) -> Result<Category> {
        let category = CategoryService::find_by_name(&self.categories, name)?.clone();
        if !CategoryService::remove(&mut self.categories, &category.id)? {
            return Err(TrackerError::NotFound(format!("category `{}`", name)));
        }
        Ok(category)
    }

    /// Links two categories by name. Returns `false` when the link was rejected.
    pub fn add_subcategory(&mut self, parent: &str, child: &str) -> Result<bool> {
        let parent_id = CategoryService::find_by_name(&self.categories, parent)?.id.clone();
        let child_id = CategoryService::find_by_name(&self.categories, child)?.id.clone();
        Ok(CategoryService::add_subcategory(
            &mut self.categories,
            &parent_id,
            &child_id,
        )?)
    }

    /// Detaches `child` from `parent`. Returns `false` when it was not attached there.
    pub fn remove_subcategory(&mut self, parent: &str, child: &str) -> Result<bool> {
        let parent_id = CategoryService::find_by_name(&self.categories, parent)?.id.clone();
        let child_id = CategoryService::find_by_name(&self.categories, child)?.id.clone();
        Ok(CategoryService::remove_subcategory(
            &mut self.categories,
            &parent_id,
            &child_id,
        )?)
    }

    pub fn budgets(&self) -> &[Budget] {
        self.budgets.records()
    }

    pub fn add_budget(&mut self, input: BudgetInput<'_>) -> Result<Budget> {
        let budget = input.into_budget()?;
        self.budgets.add(budget.clone())?;
        Ok(budget)
    }

    /// Replaces the budget at `index` in listing order, keeping its identifier.
    pub fn edit_budget(&mut self, index: usize, input: BudgetInput<'_>) -> Result<Budget> {
        let current = record_at(&self.budgets, index)?;
        let validated = input.into_budget()?;
        let updated = Budget::with_id(
            current.id.clone(),
            validated.category,
            validated.amount,
            validated.period,
        );
        replace(&mut self.budgets, &current, updated)
    }

    pub fn delete_budget(&mut self, index: usize) -> Result<Budget> {
        let current = record_at(&self.budgets, index)?;
        remove(&mut self.budgets, current)
    }

    /// Spending against every budget for the period containing today.
    pub fn budget_statuses(&self) -> Vec<BudgetStatus> {
        BudgetService::statuses(self.budgets.records(), self.expenses.records(), self.today())
    }

    pub fn recurring(&self) -> &[RecurringExpense] {
        self.recurring.records()
    }

    /// Stores a new template and immediately materializes its due occurrences.
    pub fn add_recurring(
        &mut self,
        input: RecurringInput<'_>,
    ) -> Result<(RecurringExpense, GenerationOutcome)> {
        let template = input.into_template()?;
        self.recurring.add(template.clone())?;
        let outcome = self.generate_due()?;
        let template = self
            .recurring
            .find(&template.id)
            .cloned()
            .unwrap_or(template);
        Ok((template, outcome))
    }

    /// Replaces the template at `index`, keeping its identifier and generation
    /// watermark, then materializes whatever became due.
    pub fn edit_recurring(
        &mut self,
        index: usize,
        input: RecurringInput<'_>,
    ) -> Result<(RecurringExpense, GenerationOutcome)> {
        let current = record_at(&self.recurring, index)?;
        let validated = input.into_template()?;
        let updated = RecurringExpense::with_id(
            current.id.clone(),
            validated.amount,
            validated.category,
            validated.start_date,
            validated.frequency,
            validated.description,
        )
        .with_last_generated(current.last_generated);
        let updated = replace(&mut self.recurring, &current, updated)?;
        let outcome = self.generate_due()?;
        let template = self
            .recurring
            .find(&updated.id)
            .cloned()
            .unwrap_or(updated);
        Ok((template, outcome))
    }

    /// Deletes the template at `index`. Expenses it already generated are kept.
    pub fn delete_recurring(&mut self, index: usize) -> Result<RecurringExpense> {
        let current = record_at(&self.recurring, index)?;
        remove(&mut self.recurring, current)
    }

    pub fn generate_due(&mut self) -> Result<GenerationOutcome> {
        let today = self.today();
        let outcome =
            RecurrenceService::generate_due_expenses(&mut self.recurring, &mut self.expenses, today)
                .map_err(|err| {
                    error!(error = %err, "recurring generation failed");
                    err
                })?;
        Ok(outcome)
    }

    /// Appends every valid row of the file at `path` to the expense collection.
    pub fn import(&mut self, path: &Path) -> Result<ImportReport> {
        let report = import_expenses(path)?;
        self.expenses.extend(report.records.iter().cloned())?;
        Ok(report)
    }

    /// Writes the full expense collection, ignoring view filters. Returns the row count.
    pub fn export(&self, path: &Path) -> Result<usize> {
        export_expenses(path, self.expenses.records())?;
        Ok(self.expenses.len())
    }
}

fn record_at<T: Persisted>(store: &RecordStore<T>, index: usize) -> Result<T> {
    store
        .records()
        .get(index)
        .cloned()
        .ok_or_else(|| TrackerError::NotFound(format!("no {} at row {}", T::KIND, index + 1)))
}

fn replace<T: Persisted>(store: &mut RecordStore<T>, current: &T, updated: T) -> Result<T> {
    if !store.update(current, updated.clone())? {
        return Err(TrackerError::NotFound(format!("{} {}", T::KIND, current.id())));
    }
    Ok(updated)
}

fn remove<T: Persisted>(store: &mut RecordStore<T>, current: T) -> Result<T> {
    if !store.delete(&current)? {
        return Err(TrackerError::NotFound(format!("{} {}", T::KIND, current.id())));
    }
    Ok(current)
}

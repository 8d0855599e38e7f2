//! Persistence seam between record stores and on-disk formats.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard,
};

use tracker_domain::{Budget, Category, Expense, Identifiable, RecurringExpense};

use crate::{CoreError, CoreResult};

/// Records recovered by a load, plus one warning per skipped malformed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport<T> {
    pub records: Vec<T>,
    pub warnings: Vec<String>,
}

impl<T> LoadReport<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(records: Vec<T>, warnings: Vec<String>) -> Self {
        Self { records, warnings }
    }
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Load-all/save-all contract per entity type.
///
/// Loads treat a missing backing file as an empty collection and skip malformed
/// records, reporting them as warnings. Saves replace the whole collection.
pub trait PersistenceAdapter: Send + Sync {
    fn load_expenses(&self) -> CoreResult<LoadReport<Expense>>;
    fn save_expenses(&self, expenses: &[Expense]) -> CoreResult<()>;
    fn load_categories(&self) -> CoreResult<LoadReport<Category>>;
    fn save_categories(&self, categories: &[Category]) -> CoreResult<()>;
    fn load_recurring_expenses(&self) -> CoreResult<LoadReport<RecurringExpense>>;
    fn save_recurring_expenses(&self, templates: &[RecurringExpense]) -> CoreResult<()>;
    fn load_budgets(&self) -> CoreResult<LoadReport<Budget>>;
    fn save_budgets(&self, budgets: &[Budget]) -> CoreResult<()>;
}

/// Routes a record type to its pair of adapter methods.
pub trait Persisted: Clone + PartialEq + Identifiable {
    const KIND: &'static str;

    fn load_from(adapter: &dyn PersistenceAdapter) -> CoreResult<LoadReport<Self>>;
    fn save_to(adapter: &dyn PersistenceAdapter, records: &[Self]) -> CoreResult<()>;
}

impl Persisted for Expense {
    const KIND: &'static str = "expenses";

    fn load_from(adapter: &dyn PersistenceAdapter) -> CoreResult<LoadReport<Self>> {
        adapter.load_expenses()
    }

    fn save_to(adapter: &dyn PersistenceAdapter, records: &[Self]) -> CoreResult<()> {
        adapter.save_expenses(records)
    }
}

impl Persisted for Category {
    const KIND: &'static str = "categories";

    fn load_from(adapter: &dyn PersistenceAdapter) -> CoreResult<LoadReport<Self>> {
        adapter.load_categories()
    }

    fn save_to(adapter: &dyn PersistenceAdapter, records: &[Self]) -> CoreResult<()> {
        adapter.save_categories(records)
    }
}

impl Persisted for RecurringExpense {
    const KIND: &'static str = "recurring expenses";

    fn load_from(adapter: &dyn PersistenceAdapter) -> CoreResult<LoadReport<Self>> {
        adapter.load_recurring_expenses()
    }

    fn save_to(adapter: &dyn PersistenceAdapter, records: &[Self]) -> CoreResult<()> {
        adapter.save_recurring_expenses(records)
    }
}

impl Persisted for Budget {
    const KIND: &'static str = "budgets";

    fn load_from(adapter: &dyn PersistenceAdapter) -> CoreResult<LoadReport<Self>> {
        adapter.load_budgets()
    }

    fn save_to(adapter: &dyn PersistenceAdapter, records: &[Self]) -> CoreResult<()> {
        adapter.save_budgets(records)
    }
}

#[derive(Debug, Default)]
struct MemoryCollections {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    recurring: Vec<RecurringExpense>,
    budgets: Vec<Budget>,
}

/// In-process adapter used by tests and ephemeral sessions.
///
/// `set_failing(true)` makes every call return a storage error;
/// `set_failing_expense_saves(true)` fails only `save_expenses`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<MemoryCollections>,
    failing: AtomicBool,
    failing_expense_saves: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_expense_saves(&self, failing: bool) {
        self.failing_expense_saves.store(failing, Ordering::SeqCst);
    }

    pub fn with_expenses(self, expenses: Vec<Expense>) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.expenses = expenses;
        }
        self
    }

    pub fn with_recurring(self, templates: Vec<RecurringExpense>) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.recurring = templates;
        }
        self
    }

    fn guard(&self) -> CoreResult<MutexGuard<'_, MemoryCollections>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("memory storage unavailable".into()));
        }
        self.data
            .lock()
            .map_err(|_| CoreError::Storage("memory storage poisoned".into()))
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn load_expenses(&self) -> CoreResult<LoadReport<Expense>> {
        Ok(LoadReport::new(self.guard()?.expenses.clone()))
    }

    fn save_expenses(&self, expenses: &[Expense]) -> CoreResult<()> {
        if self.failing_expense_saves.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("expense storage unavailable".into()));
        }
        self.guard()?.expenses = expenses.to_vec();
        Ok(())
    }

    fn load_categories(&self) -> CoreResult<LoadReport<Category>> {
        Ok(LoadReport::new(self.guard()?.categories.clone()))
    }

    fn save_categories(&self, categories: &[Category]) -> CoreResult<()> {
        self.guard()?.categories = categories.to_vec();
        Ok(())
    }

    fn load_recurring_expenses(&self) -> CoreResult<LoadReport<RecurringExpense>> {
        Ok(LoadReport::new(self.guard()?.recurring.clone()))
    }

    fn save_recurring_expenses(&self, templates: &[RecurringExpense]) -> CoreResult<()> {
        self.guard()?.recurring = templates.to_vec();
        Ok(())
    }

    fn load_budgets(&self) -> CoreResult<LoadReport<Budget>> {
        Ok(LoadReport::new(self.guard()?.budgets.clone()))
    }

    fn save_budgets(&self, budgets: &[Budget]) -> CoreResult<()> {
        self.guard()?.budgets = budgets.to_vec();
        Ok(())
    }
}

//! Generic in-memory collection that re-saves itself on every mutation.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::{storage::Persisted, CoreError, CoreResult, PersistenceAdapter};

/// Ordered collection of one record type backed by a [`PersistenceAdapter`].
///
/// Every mutation rewrites the full collection through the adapter. A failed
/// save is returned to the caller while the in-memory change is kept.
///
/// A store whose load failed never saves, so the unreadable backing data is
/// left untouched.
pub struct RecordStore<T: Persisted> {
    records: Vec<T>,
    adapter: Arc<dyn PersistenceAdapter>,
    revision: u64,
    load_error: Option<String>,
}

impl<T: Persisted> RecordStore<T> {
    /// Populates the store from the adapter.
    ///
    /// Skipped records are logged as warnings; a load failure is logged and
    /// yields an empty, read-only store.
    pub fn load(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        let (records, load_error) = match T::load_from(adapter.as_ref()) {
            Ok(report) => {
                for warning in &report.warnings {
                    warn!(kind = T::KIND, "{}", warning);
                }
                debug!(kind = T::KIND, count = report.records.len(), "records loaded");
                (report.records, None)
            }
            Err(err) => {
                error!(kind = T::KIND, error = %err, "load failed; starting empty");
                (Vec::new(), Some(err.to_string()))
            }
        };
        Self {
            records,
            adapter,
            revision: 0,
            load_error,
        }
    }

    pub fn load_failed(&self) -> bool {
        self.load_error.is_some()
    }

    /// Why the initial load failed, if it did.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counter bumped on every mutation, used by projections to detect staleness.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn position(&self, record: &T) -> Option<usize> {
        self.records.iter().position(|candidate| candidate == record)
    }

    /// Appends a record. Identifiers are not checked for uniqueness.
    pub fn add(&mut self, record: T) -> CoreResult<()> {
        self.records.push(record);
        self.touch();
        self.persist()
    }

    /// Appends many records with a single save.
    pub fn extend(&mut self, records: impl IntoIterator<Item = T>) -> CoreResult<()> {
        let before = self.records.len();
        self.records.extend(records);
        if self.records.len() == before {
            return Ok(());
        }
        self.touch();
        self.persist()
    }

    /// Replaces the first record equal to `old` with `new` at the same index.
    ///
    /// Returns `Ok(false)` without saving when `old` is not present.
    pub fn update(&mut self, old: &T, new: T) -> CoreResult<bool> {
        let Some(index) = self.position(old) else {
            debug!(kind = T::KIND, id = old.id(), "update target not found");
            return Ok(false);
        };
        self.records[index] = new;
        self.touch();
        self.persist()?;
        Ok(true)
    }

    /// Applies several replacements and saves once. Returns how many were applied.
    pub fn update_all(&mut self, replacements: Vec<(T, T)>) -> CoreResult<usize> {
        let applied = self.replace_unsaved(replacements);
        if applied > 0 {
            self.persist()?;
        }
        Ok(applied)
    }

    /// Applies replacements in memory only; the backing file keeps its previous contents
    /// until the next successful save.
    pub fn replace_unsaved(&mut self, replacements: Vec<(T, T)>) -> usize {
        let mut applied = 0;
        for (old, new) in replacements {
            if let Some(index) = self.position(&old) {
                self.records[index] = new;
                applied += 1;
            }
        }
        if applied > 0 {
            self.touch();
        }
        applied
    }

    /// Removes the first record equal to `record`, then saves.
    ///
    /// Returns whether a record was removed; the collection is saved either way.
    pub fn delete(&mut self, record: &T) -> CoreResult<bool> {
        let removed = match self.position(record) {
            Some(index) => {
                self.records.remove(index);
                self.touch();
                true
            }
            None => {
                debug!(kind = T::KIND, id = record.id(), "delete target not found");
                false
            }
        };
        self.persist()?;
        Ok(removed)
    }

    /// Writes the full collection through the adapter.
    pub fn persist(&self) -> CoreResult<()> {
        if let Some(reason) = &self.load_error {
            return Err(CoreError::Storage(format!(
                "{} were not loaded ({}); refusing to overwrite them",
                T::KIND,
                reason
            )));
        }
        T::save_to(self.adapter.as_ref(), &self.records).map_err(|err| {
            error!(kind = T::KIND, error = %err, "save failed");
            err
        })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tracker_domain::Expense;

    use super::*;
    use crate::MemoryStorage;

    fn expense(amount: f64, category: &str) -> Expense {
        Expense::new(
            amount,
            category,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "",
        )
    }

    #[test]
    fn add_persists_and_reloads() {
        let adapter = Arc::new(MemoryStorage::new());
        let mut store: RecordStore<Expense> = RecordStore::load(adapter.clone());
        let record = expense(12.5, "Food");
        store.add(record.clone()).unwrap();

        let reloaded: RecordStore<Expense> = RecordStore::load(adapter);
        assert_eq!(reloaded.records(), &[record]);
    }

    #[test]
    fn update_replaces_in_place() {
        let adapter = Arc::new(MemoryStorage::new());
        let mut store: RecordStore<Expense> = RecordStore::load(adapter);
        let first = expense(1.0, "Food");
        let second = expense(2.0, "Transport");
        store.extend([first.clone(), second.clone()]).unwrap();

        let mut changed = first.clone();
        changed.amount = 9.0;
        assert!(store.update(&first, changed.clone()).unwrap());
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0], changed);

        let revision = store.revision();
        assert!(!store.update(&first, expense(3.0, "Food")).unwrap());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn delete_removes_only_first_match() {
        let adapter = Arc::new(MemoryStorage::new());
        let mut store: RecordStore<Expense> = RecordStore::load(adapter);
        let record = expense(1.0, "Food");
        store.extend([record.clone(), record.clone()]).unwrap();

        assert!(store.delete(&record).unwrap());
        assert_eq!(store.len(), 1);
        assert!(!store.delete(&expense(5.0, "Other")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let adapter = Arc::new(MemoryStorage::new());
        let mut store: RecordStore<Expense> = RecordStore::load(adapter.clone());
        adapter.set_failing(true);

        assert!(store.add(expense(4.0, "Food")).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failed_load_yields_empty_store() {
        let adapter = Arc::new(MemoryStorage::new().with_expenses(vec![expense(1.0, "Food")]));
        adapter.set_failing(true);
        let store: RecordStore<Expense> = RecordStore::load(adapter);
        assert!(store.is_empty());
        assert!(store.load_failed());
        assert!(store.load_error().is_some());
    }

    #[test]
    fn failed_load_never_overwrites_backing_data() {
        let original = expense(1.0, "Food");
        let adapter = Arc::new(MemoryStorage::new().with_expenses(vec![original.clone()]));
        adapter.set_failing(true);
        let mut store: RecordStore<Expense> = RecordStore::load(adapter.clone());
        adapter.set_failing(false);

        assert!(store.add(expense(2.0, "Transport")).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(adapter.load_expenses().unwrap().records, vec![original]);
    }
}

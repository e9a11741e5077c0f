use std::collections::HashSet;

use tracing::{debug, info};

use crate::{
    errors::{Result, TrackerError},
    storage::StorageBackend,
};

use super::transaction::{fresh_id, Transaction};

/// Ordered transaction collection backed by a durable slot. Loaded once at
/// open; every mutation rewrites the slot in full before returning, so each
/// operation is atomic from the caller's perspective.
pub struct TransactionStore<S: StorageBackend> {
    transactions: Vec<Transaction>,
    backend: S,
}

impl<S: StorageBackend> TransactionStore<S> {
    /// Loads the stored list, or starts empty when nothing is stored yet.
    pub fn open(backend: S) -> Result<Self> {
        let transactions = backend.load()?;
        info!(count = transactions.len(), "transaction store opened");
        Ok(Self {
            transactions,
            backend,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Appends a transaction and persists. Blank ids get a fresh uuid; the id
    /// is immutable afterwards. Amounts must be finite and non-negative (the
    /// sign lives on the category type, not the record).
    pub fn add(&mut self, mut transaction: Transaction) -> Result<&Transaction> {
        if !transaction.amount.is_finite() || transaction.amount < 0.0 {
            return Err(TrackerError::InvalidInput(format!(
                "amount must be a finite non-negative number, got {}",
                transaction.amount
            )));
        }
        if transaction.id.is_empty() {
            transaction.id = fresh_id();
        }
        debug!(id = %transaction.id, amount = transaction.amount, "adding transaction");
        self.transactions.push(transaction);
        self.persist()?;
        Ok(self.transactions.last().unwrap())
    }

    /// Removes the transaction with `id` and persists. Unknown ids are a
    /// no-op returning `false`.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        if self.transactions.len() == before {
            return Ok(false);
        }
        debug!(%id, "transaction deleted");
        self.persist()?;
        Ok(true)
    }

    /// Merges imported transactions, skipping any whose id already exists in
    /// the store. Membership is by exact id, not content equality, so two
    /// records with different ids but identical fields are both kept.
    /// Returns the number actually appended.
    pub fn import_merge(&mut self, imported: Vec<Transaction>) -> Result<usize> {
        let existing: HashSet<String> = self.transactions.iter().map(|t| t.id.clone()).collect();
        let mut appended = 0usize;
        for transaction in imported {
            if existing.contains(&transaction.id) {
                continue;
            }
            self.transactions.push(transaction);
            appended += 1;
        }
        if appended > 0 {
            self.persist()?;
        }
        info!(appended, "import merge finished");
        Ok(appended)
    }

    fn persist(&self) -> Result<()> {
        self.backend.save(&self.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// In-memory backend standing in for the JSON slot.
    #[derive(Default)]
    struct MemoryBackend {
        saved: RefCell<Vec<Transaction>>,
    }

    impl StorageBackend for MemoryBackend {
        fn save(&self, transactions: &[Transaction]) -> Result<()> {
            *self.saved.borrow_mut() = transactions.to_vec();
            Ok(())
        }

        fn load(&self) -> Result<Vec<Transaction>> {
            Ok(self.saved.borrow().clone())
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tx(id: &str, amount: f64) -> Transaction {
        let mut t = Transaction::new(amount, "exp_ocio", d(2024, 3, 10), "");
        t.id = id.to_string();
        t
    }

    #[test]
    fn add_persists_and_assigns_missing_ids() {
        let mut store = TransactionStore::open(MemoryBackend::default()).unwrap();
        let added = store.add(tx("", 10.0)).unwrap();
        assert!(!added.id.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn negative_or_non_finite_amounts_are_rejected() {
        let mut store = TransactionStore::open(MemoryBackend::default()).unwrap();
        assert!(matches!(
            store.add(tx("abcdef", -1.0)),
            Err(TrackerError::InvalidInput(_))
        ));
        assert!(matches!(
            store.add(tx("abcdef", f64::NAN)),
            Err(TrackerError::InvalidInput(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_unknown_id_is_a_noop() {
        let mut store = TransactionStore::open(MemoryBackend::default()).unwrap();
        store.add(tx("abcdef", 10.0)).unwrap();
        assert!(!store.delete("nope").unwrap());
        assert!(store.delete("abcdef").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn import_merge_dedupes_by_id_only() {
        let mut store = TransactionStore::open(MemoryBackend::default()).unwrap();
        store.add(tx("id-one", 10.0)).unwrap();

        // Same id is skipped; identical content under a new id is kept.
        let imported = vec![tx("id-one", 99.0), tx("id-two", 10.0)];
        let appended = store.import_merge(imported).unwrap();
        assert_eq!(appended, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.transactions()[0].amount, 10.0);
    }

    #[test]
    fn order_of_insertion_is_preserved() {
        let mut store = TransactionStore::open(MemoryBackend::default()).unwrap();
        store.add(tx("id-one", 1.0)).unwrap();
        store.add(tx("id-two", 2.0)).unwrap();
        store.import_merge(vec![tx("id-three", 3.0)]).unwrap();
        let ids: Vec<_> = store.transactions().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["id-one", "id-two", "id-three"]);
    }
}

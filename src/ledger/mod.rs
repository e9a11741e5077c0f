//! Ledger domain models: transactions, recurrence rules, and the persisted
//! in-memory store.

pub mod store;
pub mod transaction;

pub use store::TransactionStore;
pub use transaction::{RecurrenceFrequency, RecurrenceRule, Transaction};

pub mod json_backend;

use crate::{errors::Result, ledger::Transaction};

/// Abstraction over the durable slot holding the full transaction list.
/// The whole list is rewritten on every mutation; there is no incremental or
/// partial persistence.
pub trait StorageBackend {
    fn save(&self, transactions: &[Transaction]) -> Result<()>;
    fn load(&self) -> Result<Vec<Transaction>>;
}

pub use json_backend::JsonStorage;

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    errors::{Result, TrackerError},
    ledger::Transaction,
    utils::app_data_dir,
};

use super::StorageBackend;

const SLOT_FILE: &str = "finvibe_transactions.json";
const TMP_SUFFIX: &str = "tmp";

/// Single-slot JSON persistence: one file holding the entire transaction list
/// as one serialized array, overwritten wholesale on every save.
#[derive(Clone)]
pub struct JsonStorage {
    slot_file: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        Ok(Self {
            slot_file: base.join(SLOT_FILE),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn slot_path(&self) -> &Path {
        &self.slot_file
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string_pretty(transactions)?;
        let tmp = tmp_path(&self.slot_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.slot_file)?;
        debug!(count = transactions.len(), "transaction slot written");
        Ok(())
    }

    fn load(&self) -> Result<Vec<Transaction>> {
        if !self.slot_file.exists() {
            debug!("transaction slot absent, starting empty");
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.slot_file)?;
        let transactions: Vec<Transaction> = serde_json::from_str(&data).map_err(|err| {
            TrackerError::Storage(format!(
                "slot `{}` unreadable: {}",
                self.slot_file.display(),
                err
            ))
        })?;
        debug!(count = transactions.len(), "transaction slot loaded");
        Ok(transactions)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    fn sample_transaction() -> Transaction {
        Transaction::new(
            50.0,
            "exp_ocio",
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            "cine",
        )
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let transactions = vec![sample_transaction()];
        storage.save(&transactions).expect("save slot");
        let loaded = storage.load().expect("load slot");
        assert_eq!(loaded, transactions);
    }

    #[test]
    fn missing_slot_loads_as_empty() {
        let (storage, _guard) = storage_with_temp_dir();
        let loaded = storage.load().expect("load absent slot");
        assert!(loaded.is_empty());
    }

    #[test]
    fn corrupt_slot_surfaces_storage_error() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.slot_path(), "{not json").expect("write corrupt slot");
        let err = storage.load().expect_err("corrupt slot should fail");
        assert!(matches!(err, TrackerError::Storage(_)));
    }
}

//! Application history storage: the JSON array in `applications.json`.
//!
//! Every write rewrites the whole file. A missing file is an empty history.

use std::{fs, io};

use tracing::debug;

use crate::model::{ApplicationRecord, RecordId, StoredRecord};

use super::{ApplicationStore, Result, Storage, StorageError};

impl Storage {
    fn read_history(&self) -> Result<Vec<StoredRecord>> {
        let path = self.history_path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn write_history(&self, records: &[StoredRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(self.history_path(), json)?;
        Ok(())
    }
}

impl ApplicationStore for Storage {
    fn load_all(&self) -> Result<Vec<StoredRecord>> {
        let records = self.read_history()?;
        debug!(count = records.len(), "loaded application history");
        Ok(records)
    }

    fn save(&self, record: &ApplicationRecord) -> Result<()> {
        let mut records = self.read_history()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StorageError::RecordAlreadyExists(record.id.clone()));
        }
        records.push(StoredRecord::from(record));
        self.write_history(&records)?;
        debug!(id = %record.id, "saved application");
        Ok(())
    }

    fn update(&self, record: &ApplicationRecord) -> Result<()> {
        let mut records = self.read_history()?;
        let Some(slot) = records.iter_mut().find(|r| r.id == record.id) else {
            debug!(id = %record.id, "update skipped: no stored application with this id");
            return Ok(());
        };
        *slot = StoredRecord::from(record);
        self.write_history(&records)?;
        debug!(id = %record.id, "updated application");
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> Result<()> {
        let mut records = self.read_history()?;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            debug!(%id, "delete skipped: no stored application with this id");
            return Ok(());
        }
        self.write_history(&records)?;
        debug!(%id, "deleted application");
        Ok(())
    }
}

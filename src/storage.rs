//! Local persistence for application history and the candidate profile.
//!
//! Everything lives under one storage root:
//!
//! ```text
//! <root>/
//!   applications.json   # JSON array, one element per application record
//!   profile.md          # The candidate profile, as last saved
//! ```

mod applications;
mod profile;

use std::{fs, io, path::PathBuf};

use crate::model::{ApplicationRecord, RecordId, StoredRecord};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("application already exists: {0}")]
    RecordAlreadyExists(RecordId),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Persistence for application records.
///
/// Records come back in storage order as written; callers sort as needed.
/// Records are returned in their on-disk shape so that older histories can
/// be upgraded by the reader.
pub trait ApplicationStore {
    /// Loads every stored record.
    fn load_all(&self) -> Result<Vec<StoredRecord>>;

    /// Appends a new record.
    fn save(&self, record: &ApplicationRecord) -> Result<()>;

    /// Replaces the stored record with the same id. Unknown ids are ignored.
    fn update(&self, record: &ApplicationRecord) -> Result<()>;

    /// Removes the stored record with this id. Unknown ids are ignored.
    fn delete(&self, id: &RecordId) -> Result<()>;
}

/// Local file-based storage.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.applykit/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".applykit"))
    }

    fn history_path(&self) -> PathBuf {
        self.root.join("applications.json")
    }

    fn profile_path(&self) -> PathBuf {
        self.root.join("profile.md")
    }
}

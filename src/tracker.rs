//! The recruitment pipeline tracker.
//!
//! Owns the in-memory application history and mirrors every mutation to an
//! [`ApplicationStore`]. Memory is updated first, then the change is
//! persisted; a failed write is returned to the caller and the in-memory
//! change stays, so the session keeps what the user did even if it may not
//! survive a restart. Nothing is retried here.
//!
//! Every mutation takes `&mut self`, so writes for a record never overlap.

mod view;

use jiff::Timestamp;
use tracing::{debug, info, warn};

use crate::generate::{AssetGenerator, GenerationError, GenerationRequest};
use crate::model::{
    ApplicationRecord, AssetKind, AssetPayload, GeneratedAssets, OverallStatus, RecordId,
    RecruitmentStage, StoredRecord,
};
use crate::storage::{ApplicationStore, StorageError};

pub use view::{BadgeStyle, SortKey, sorted_view, status_badge};

/// Company recorded when none was given.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Errors raised by tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("application not found: {0}")]
    NotFound(String),

    #[error("'{reference}' is ambiguous, matches {}", .candidates.join(", "))]
    AmbiguousId {
        reference: String,
        candidates: Vec<String>,
    },

    #[error("stage {index} is out of range: application has {len} stage(s)")]
    StageOutOfRange { index: usize, len: usize },

    #[error("stage label must not be empty")]
    EmptyStageLabel,

    #[error("job title is required")]
    MissingTitle,

    #[error("generator returned {actual} when {expected} was requested")]
    KindMismatch {
        expected: AssetKind,
        actual: AssetKind,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T> = core::result::Result<T, TrackerError>;

/// What the save-application action hands over to create a record.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub title: String,
    pub company: String,
    pub description: String,
    pub profile_content: String,
    pub assets: GeneratedAssets,
}

/// In-memory application history backed by a store.
pub struct Tracker<S> {
    store: S,
    records: Vec<ApplicationRecord>,
}

impl<S: ApplicationStore> Tracker<S> {
    /// Loads every record from the store, back-filling pipeline fields for
    /// records written before pipeline tracking. The back-fill is not
    /// written back until the record is next mutated.
    pub fn load(store: S) -> Result<Self> {
        let stored = store.load_all()?;
        let legacy = stored
            .iter()
            .filter(|r| r.overall_status.is_none() || r.stages.as_ref().is_none_or(Vec::is_empty))
            .count();
        if legacy > 0 {
            debug!(legacy, "back-filled pipeline fields on older records");
        }
        let records = stored.into_iter().map(StoredRecord::upgrade).collect();
        Ok(Self { store, records })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: &RecordId) -> Option<&ApplicationRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Resolves a full id or an unambiguous id prefix.
    pub fn resolve(&self, reference: &str) -> Result<&ApplicationRecord> {
        if let Some(record) = self.records.iter().find(|r| r.id.as_str() == reference) {
            return Ok(record);
        }

        let matches: Vec<&ApplicationRecord> = self
            .records
            .iter()
            .filter(|r| r.id.as_str().starts_with(reference))
            .collect();

        match matches.as_slice() {
            [] => Err(TrackerError::NotFound(reference.to_string())),
            [record] => Ok(record),
            many => Err(TrackerError::AmbiguousId {
                reference: reference.to_string(),
                candidates: many.iter().map(|r| r.id.short().to_string()).collect(),
            }),
        }
    }

    /// The collection ordered by `key`. The collection itself is untouched.
    pub fn sorted(&self, key: SortKey) -> Vec<&ApplicationRecord> {
        sorted_view(&self.records, key)
    }

    /// Creates a record with a fresh id, the current time, and the seed
    /// "Applied" stage.
    pub fn create(&mut self, new: NewApplication) -> Result<&ApplicationRecord> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(TrackerError::MissingTitle);
        }
        let company = match new.company.trim() {
            "" => UNKNOWN_COMPANY,
            company => company,
        };

        let date = Timestamp::now();
        let record = ApplicationRecord {
            id: RecordId::generate(),
            date,
            title: title.to_string(),
            company: company.to_string(),
            description: new.description,
            profile_content: new.profile_content,
            assets: new.assets,
            overall_status: OverallStatus::Active,
            stages: vec![RecruitmentStage::seed(date)],
        };
        info!(id = %record.id, company = %record.company, "created application");

        self.records.push(record);
        let record = &self.records[self.records.len() - 1];
        self.store.save(record)?;
        Ok(record)
    }

    /// Sets the overall status. Nothing else changes; re-setting the same
    /// status still persists.
    pub fn set_overall_status(
        &mut self,
        id: &RecordId,
        status: OverallStatus,
    ) -> Result<&ApplicationRecord> {
        let record = find_mut(&mut self.records, id)?;
        record.overall_status = status;
        info!(%id, %status, "set overall status");

        self.store.update(record)?;
        Ok(&*record)
    }

    /// Makes the stage at `index` current: earlier stages become completed,
    /// later ones pending. The stage is dated the first time it becomes
    /// current. A rejected or ghosted application becomes active again,
    /// since moving the pipeline means it is live.
    pub fn set_stage_current(&mut self, id: &RecordId, index: usize) -> Result<&ApplicationRecord> {
        let record = find_mut(&mut self.records, id)?;
        let len = record.stages.len();
        if index >= len {
            return Err(TrackerError::StageOutOfRange { index, len });
        }

        let now = Timestamp::now();
        for (i, stage) in record.stages.iter_mut().enumerate() {
            stage.completed = i < index;
            stage.current = i == index;
            if stage.current && stage.date.is_none() {
                stage.date = Some(now);
            }
        }

        if matches!(
            record.overall_status,
            OverallStatus::Rejected | OverallStatus::Ghosted
        ) {
            info!(%id, from = %record.overall_status, "pipeline moved, reactivating application");
            record.overall_status = OverallStatus::Active;
        }
        info!(%id, index, label = %record.stages[index].label, "set current stage");

        self.store.update(record)?;
        Ok(&*record)
    }

    /// Appends a pending stage. Blank labels are rejected without touching
    /// the record.
    pub fn add_stage(&mut self, id: &RecordId, label: &str) -> Result<&ApplicationRecord> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TrackerError::EmptyStageLabel);
        }

        let record = find_mut(&mut self.records, id)?;
        record.stages.push(RecruitmentStage::pending(label));
        info!(%id, label, "added stage");

        self.store.update(record)?;
        Ok(&*record)
    }

    /// Removes the record from memory and from the store. Returns whether a
    /// record was removed; an unknown id is not an error.
    pub fn delete_record(&mut self, id: &RecordId) -> Result<bool> {
        let Some(pos) = self.records.iter().position(|r| &r.id == id) else {
            debug!(%id, "delete skipped: unknown application");
            return Ok(false);
        };
        self.records.remove(pos);
        info!(%id, "deleted application");

        self.store.delete(id)?;
        Ok(true)
    }

    /// Replaces the whole asset bundle, e.g. after the resume was edited.
    pub fn update_assets(
        &mut self,
        id: &RecordId,
        assets: GeneratedAssets,
    ) -> Result<&ApplicationRecord> {
        let record = find_mut(&mut self.records, id)?;
        record.assets = assets;
        info!(%id, "updated assets");

        self.store.update(record)?;
        Ok(&*record)
    }

    /// Snapshot of the context needed to generate `kind` for a record.
    pub fn generation_request(&self, id: &RecordId, kind: AssetKind) -> Result<GenerationRequest> {
        let record = self
            .get(id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        Ok(GenerationRequest::for_record(record, kind))
    }

    /// Merges a generated asset into the record. A payload of another kind
    /// than requested is refused and the record is left as it was.
    pub fn attach_asset(
        &mut self,
        id: &RecordId,
        kind: AssetKind,
        payload: AssetPayload,
    ) -> Result<&ApplicationRecord> {
        if payload.kind() != kind {
            return Err(TrackerError::KindMismatch {
                expected: kind,
                actual: payload.kind(),
            });
        }

        let record = find_mut(&mut self.records, id)?;
        record.assets.merge(payload);
        info!(%id, %kind, "attached generated asset");

        self.store.update(record)?;
        Ok(&*record)
    }

    /// Generates `kind` for a record and attaches it. On failure the record
    /// is unchanged and the error is returned.
    pub fn generate_missing<G>(
        &mut self,
        id: &RecordId,
        kind: AssetKind,
        generator: &G,
    ) -> Result<&ApplicationRecord>
    where
        G: AssetGenerator + ?Sized,
    {
        let request = self.generation_request(id, kind)?;
        let payload = generator.generate(&request).inspect_err(|e| {
            warn!(%id, %kind, error = %e, "asset generation failed");
        })?;
        self.attach_asset(id, kind, payload)
    }
}

fn find_mut<'a>(
    records: &'a mut [ApplicationRecord],
    id: &RecordId,
) -> Result<&'a mut ApplicationRecord> {
    records
        .iter_mut()
        .find(|r| &r.id == id)
        .ok_or_else(|| TrackerError::NotFound(id.to_string()))
}

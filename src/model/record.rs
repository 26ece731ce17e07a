//! Application records: the unit of tracking in applykit.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GeneratedAssets, RecruitmentStage};

/// Opaque record identifier.
///
/// New records get a UUID; older histories used other schemes, so any
/// string is accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for compact display.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an application stands overall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    #[default]
    Active,
    Rejected,
    Hired,
    /// No response from the employer.
    Ghosted,
}

impl OverallStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OverallStatus::Active => "active",
            OverallStatus::Rejected => "rejected",
            OverallStatus::Hired => "hired",
            OverallStatus::Ghosted => "ghosted",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One tracked job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: RecordId,
    pub date: Timestamp,
    pub title: String,
    pub company: String,
    /// Job description snapshot taken when the kit was generated.
    pub description: String,
    /// Candidate profile snapshot taken when the kit was generated.
    pub profile_content: String,
    pub assets: GeneratedAssets,
    pub overall_status: OverallStatus,
    /// Pipeline order. Never empty.
    pub stages: Vec<RecruitmentStage>,
}

impl ApplicationRecord {
    /// Position of the stage marked current, if any.
    pub fn current_stage_index(&self) -> Option<usize> {
        self.stages.iter().position(|s| s.current)
    }

    /// Deletion is only offered for applications that ended in rejection.
    pub fn is_deletable(&self) -> bool {
        self.overall_status == OverallStatus::Rejected
    }
}

/// A record as it sits on disk.
///
/// Histories written before pipeline tracking existed lack `overallStatus`
/// and `stages`; those fields are optional here and filled in by
/// [`StoredRecord::upgrade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: RecordId,
    pub date: Timestamp,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_content: String,
    pub assets: GeneratedAssets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_status: Option<OverallStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<RecruitmentStage>>,
}

impl StoredRecord {
    /// Back-fills the pipeline fields: status defaults to active, and a
    /// missing or empty stage list becomes a single seed stage dated from
    /// the record.
    pub fn upgrade(self) -> ApplicationRecord {
        let stages = match self.stages {
            Some(stages) if !stages.is_empty() => stages,
            _ => vec![RecruitmentStage::seed(self.date)],
        };
        ApplicationRecord {
            id: self.id,
            date: self.date,
            title: self.title,
            company: self.company,
            description: self.description,
            profile_content: self.profile_content,
            assets: self.assets,
            overall_status: self.overall_status.unwrap_or_default(),
            stages,
        }
    }
}

impl From<&ApplicationRecord> for StoredRecord {
    fn from(record: &ApplicationRecord) -> Self {
        Self {
            id: record.id.clone(),
            date: record.date,
            title: record.title.clone(),
            company: record.company.clone(),
            description: record.description.clone(),
            profile_content: record.profile_content.clone(),
            assets: record.assets.clone(),
            overall_status: Some(record.overall_status),
            stages: Some(record.stages.clone()),
        }
    }
}

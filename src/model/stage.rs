//! Recruitment stages: the milestones of one application's pipeline.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label of the stage every record starts with.
pub const SEED_STAGE_LABEL: &str = "Applied";

/// One milestone in a record's pipeline.
///
/// Stages are linearly ordered by their position in the owning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentStage {
    /// Unique within the owning record.
    pub id: String,
    pub label: String,
    /// The pipeline has moved past this stage.
    pub completed: bool,
    /// The active milestone. At most one per record.
    pub current: bool,
    /// Set the first time the stage becomes current, never overwritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
}

impl RecruitmentStage {
    /// The "Applied" stage a record is created with: completed and current.
    pub fn seed(date: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: SEED_STAGE_LABEL.to_string(),
            completed: true,
            current: true,
            date: Some(date),
        }
    }

    /// A stage appended by the user. Neither completed nor current, undated.
    pub fn pending(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            completed: false,
            current: false,
            date: None,
        }
    }
}

//! Core data model for applykit.
//!
//! These types describe a tracked job application: the record itself,
//! its recruitment pipeline, and the bundle of generated assets.

mod assets;
mod record;
mod stage;

pub use assets::{AssetKind, AssetPayload, EmailKit, GeneratedAssets, InterviewQuestion};
pub use record::{ApplicationRecord, OverallStatus, RecordId, StoredRecord};
pub use stage::{RecruitmentStage, SEED_STAGE_LABEL};

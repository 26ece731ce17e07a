//! Generated application assets.
//!
//! A kit is built incrementally: the resume is always there, everything else
//! may be generated later. Each optional field stands on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The bundle of generated content attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAssets {
    pub resume_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_prep: Option<Vec<InterviewQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_kit: Option<EmailKit>,
}

/// A likely interview question with coaching notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
    /// Why the interviewer is asking.
    pub context: String,
    pub suggested_answer: String,
}

/// Outreach templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailKit {
    pub linked_in_connection: String,
    pub follow_up_email: String,
}

/// An asset that can be generated after the record was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    CoverLetter,
    StrategyStory,
    InterviewPrep,
    EmailKit,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::CoverLetter,
        AssetKind::StrategyStory,
        AssetKind::InterviewPrep,
        AssetKind::EmailKit,
    ];

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            AssetKind::CoverLetter => "cover letter",
            AssetKind::StrategyStory => "strategy story",
            AssetKind::InterviewPrep => "interview prep",
            AssetKind::EmailKit => "email kit",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A freshly generated asset, shaped for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPayload {
    CoverLetter(String),
    StrategyStory(String),
    InterviewPrep(Vec<InterviewQuestion>),
    EmailKit(EmailKit),
}

impl AssetPayload {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetPayload::CoverLetter(_) => AssetKind::CoverLetter,
            AssetPayload::StrategyStory(_) => AssetKind::StrategyStory,
            AssetPayload::InterviewPrep(_) => AssetKind::InterviewPrep,
            AssetPayload::EmailKit(_) => AssetKind::EmailKit,
        }
    }
}

impl GeneratedAssets {
    /// Whether the asset of this kind is present and non-empty.
    pub fn has(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::CoverLetter => self.cover_letter.as_ref().is_some_and(|s| !s.is_empty()),
            AssetKind::StrategyStory => self.strategy_story.as_ref().is_some_and(|s| !s.is_empty()),
            AssetKind::InterviewPrep => self.interview_prep.as_ref().is_some_and(|q| !q.is_empty()),
            AssetKind::EmailKit => self.email_kit.is_some(),
        }
    }

    /// Kinds still waiting to be generated, in display order.
    pub fn missing(&self) -> Vec<AssetKind> {
        AssetKind::ALL
            .into_iter()
            .filter(|kind| !self.has(*kind))
            .collect()
    }

    /// Stores the payload in its slot, replacing any previous value.
    pub fn merge(&mut self, payload: AssetPayload) {
        match payload {
            AssetPayload::CoverLetter(text) => self.cover_letter = Some(text),
            AssetPayload::StrategyStory(text) => self.strategy_story = Some(text),
            AssetPayload::InterviewPrep(questions) => self.interview_prep = Some(questions),
            AssetPayload::EmailKit(kit) => self.email_kit = Some(kit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_populated_legacy_assets_deserialize() {
        let json = r#"{
            "resumeHtml": "<html></html>",
            "coverLetter": "Dear team",
            "strategyStory": "Bridge the gap",
            "interviewPrep": [
                {"question": "Why us?", "context": "Motivation", "suggestedAnswer": "Mission"}
            ],
            "emailKit": {"linkedInConnection": "Hi", "followUpEmail": "Thanks"}
        }"#;

        let assets: GeneratedAssets = serde_json::from_str(json).unwrap();

        assert!(assets.missing().is_empty());
        assert_eq!(assets.interview_prep.unwrap()[0].suggested_answer, "Mission");
    }

    #[test]
    fn resume_only_assets_report_everything_else_missing() {
        let assets: GeneratedAssets =
            serde_json::from_str(r#"{"resumeHtml": "<html></html>"}"#).unwrap();

        assert_eq!(assets.missing(), AssetKind::ALL.to_vec());
    }

    #[test]
    fn empty_text_counts_as_missing() {
        let assets = GeneratedAssets {
            resume_html: "<html></html>".into(),
            cover_letter: Some(String::new()),
            interview_prep: Some(vec![]),
            ..Default::default()
        };

        assert!(!assets.has(AssetKind::CoverLetter));
        assert!(!assets.has(AssetKind::InterviewPrep));
    }

    #[test]
    fn merge_fills_only_the_matching_slot() {
        let mut assets = GeneratedAssets {
            resume_html: "<html></html>".into(),
            ..Default::default()
        };

        assets.merge(AssetPayload::CoverLetter("Dear team".into()));

        assert_eq!(assets.cover_letter.as_deref(), Some("Dear team"));
        assert_eq!(
            assets.missing(),
            vec![
                AssetKind::StrategyStory,
                AssetKind::InterviewPrep,
                AssetKind::EmailKit
            ]
        );
    }

    #[test]
    fn absent_optional_fields_are_not_serialized() {
        let assets = GeneratedAssets {
            resume_html: "<html></html>".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&assets).unwrap();

        assert_eq!(json, serde_json::json!({"resumeHtml": "<html></html>"}));
    }
}

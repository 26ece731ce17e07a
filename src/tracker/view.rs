//! Derived views over the history: ordering and status badges.
//!
//! Pure functions; nothing here mutates a record.

use std::cmp::Reverse;

use crate::model::{ApplicationRecord, OverallStatus, SEED_STAGE_LABEL};

/// How the history list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Time,
    /// Company name, case-insensitive.
    Az,
    /// Furthest along first; closed-out applications last.
    Progress,
}

/// Ranking used by [`SortKey::Progress`].
///
/// Rejected is -1 and ghosted is 0. Anything else scores one more than
/// its current stage index, counting a missing current stage as index 0.
pub fn progress_score(record: &ApplicationRecord) -> i64 {
    match record.overall_status {
        OverallStatus::Rejected => -1,
        OverallStatus::Ghosted => 0,
        OverallStatus::Active | OverallStatus::Hired => {
            let index = record.current_stage_index().unwrap_or(0);
            i64::try_from(index).unwrap_or(i64::MAX - 1) + 1
        }
    }
}

/// Orders `records` by `key` without touching the slice.
///
/// The sort is stable: records that compare equal keep their relative
/// order in `records`.
pub fn sorted_view(records: &[ApplicationRecord], key: SortKey) -> Vec<&ApplicationRecord> {
    let mut sorted: Vec<&ApplicationRecord> = records.iter().collect();
    match key {
        SortKey::Time => sorted.sort_by_key(|r| Reverse(r.date)),
        SortKey::Az => sorted.sort_by_cached_key(|r| r.company.to_lowercase()),
        SortKey::Progress => sorted.sort_by_key(|r| Reverse(progress_score(r))),
    }
    sorted
}

/// Visual treatment of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    /// Active, still at the first stage.
    Applied,
    /// Active past the first stage.
    Active,
    Hired,
    Rejected,
    /// No response.
    Muted,
}

/// The one-glance status of an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub style: BadgeStyle,
}

impl StatusBadge {
    fn new(label: impl Into<String>, style: BadgeStyle) -> Self {
        Self {
            label: label.into(),
            style,
        }
    }
}

pub fn status_badge(record: &ApplicationRecord) -> StatusBadge {
    match record.overall_status {
        OverallStatus::Rejected => StatusBadge::new("Rejected", BadgeStyle::Rejected),
        OverallStatus::Hired => StatusBadge::new("Hired", BadgeStyle::Hired),
        OverallStatus::Ghosted => StatusBadge::new("No Response", BadgeStyle::Muted),
        OverallStatus::Active => match record.current_stage_index() {
            Some(0) => StatusBadge::new(SEED_STAGE_LABEL, BadgeStyle::Applied),
            Some(i) => StatusBadge::new(record.stages[i].label.clone(), BadgeStyle::Active),
            // No stage marked current; shouldn't happen.
            None => StatusBadge::new("Unknown", BadgeStyle::Active),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::{GeneratedAssets, RecordId, RecruitmentStage};

    fn record(company: &str, date: &str) -> ApplicationRecord {
        let date: Timestamp = format!("{date}T00:00:00Z").parse().unwrap();
        ApplicationRecord {
            id: RecordId(format!("{company}-{date}")),
            date,
            title: "Engineer".into(),
            company: company.into(),
            description: String::new(),
            profile_content: String::new(),
            assets: GeneratedAssets::default(),
            overall_status: OverallStatus::Active,
            stages: vec![RecruitmentStage::seed(date)],
        }
    }

    /// A record with `count` stages, the one at `current` marked current.
    fn at_stage(company: &str, count: usize, current: Option<usize>) -> ApplicationRecord {
        let mut r = record(company, "2024-01-01");
        r.stages = (0..count)
            .map(|i| {
                let mut s = RecruitmentStage::pending(format!("Stage {i}"));
                s.current = current == Some(i);
                s.completed = current.is_some_and(|c| i < c);
                s
            })
            .collect();
        r
    }

    fn with_status(mut r: ApplicationRecord, status: OverallStatus) -> ApplicationRecord {
        r.overall_status = status;
        r
    }

    fn companies(sorted: &[&ApplicationRecord]) -> Vec<String> {
        sorted.iter().map(|r| r.company.clone()).collect()
    }

    #[test]
    fn az_is_case_insensitive_ascending() {
        let records = vec![
            record("zeta", "2024-01-01"),
            record("Acme", "2024-01-02"),
            record("beta", "2024-01-03"),
        ];

        let sorted = sorted_view(&records, SortKey::Az);

        assert_eq!(companies(&sorted), vec!["Acme", "beta", "zeta"]);
    }

    #[test]
    fn time_is_newest_first() {
        let records = vec![
            record("a", "2024-01-01"),
            record("b", "2024-03-01"),
            record("c", "2024-02-01"),
        ];

        let sorted = sorted_view(&records, SortKey::Time);

        assert_eq!(companies(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn sorting_leaves_collection_untouched() {
        let records = vec![record("b", "2024-01-01"), record("a", "2024-01-02")];
        let before = records.clone();

        let _ = sorted_view(&records, SortKey::Az);

        assert_eq!(records, before);
    }

    #[test]
    fn progress_puts_rejected_after_any_active() {
        let records = vec![
            with_status(at_stage("deep-rejected", 5, Some(4)), OverallStatus::Rejected),
            at_stage("fresh", 1, Some(0)),
            with_status(at_stage("ghost", 3, Some(2)), OverallStatus::Ghosted),
            at_stage("onsite", 3, Some(2)),
        ];

        let sorted = sorted_view(&records, SortKey::Progress);

        assert_eq!(
            companies(&sorted),
            vec!["onsite", "fresh", "ghost", "deep-rejected"]
        );
    }

    #[test]
    fn progress_ghosted_tie_keeps_collection_order() {
        let records = vec![
            with_status(at_stage("ghost-deep", 4, Some(3)), OverallStatus::Ghosted),
            with_status(at_stage("ghost-shallow", 1, Some(0)), OverallStatus::Ghosted),
        ];

        let sorted = sorted_view(&records, SortKey::Progress);

        assert_eq!(companies(&sorted), vec!["ghost-deep", "ghost-shallow"]);
        assert_eq!(progress_score(&records[0]), progress_score(&records[1]));
    }

    #[test]
    fn progress_is_stable_across_calls() {
        let records = vec![
            at_stage("a", 2, Some(1)),
            at_stage("b", 2, Some(1)),
            at_stage("c", 2, Some(1)),
        ];

        let first = companies(&sorted_view(&records, SortKey::Progress));
        let second = companies(&sorted_view(&records, SortKey::Progress));

        assert_eq!(first, vec!["a", "b", "c"]);
        assert_eq!(first, second);
    }

    #[test]
    fn progress_scores() {
        assert_eq!(progress_score(&at_stage("a", 3, Some(2))), 3);
        assert_eq!(progress_score(&at_stage("a", 3, None)), 1);
        assert_eq!(
            progress_score(&with_status(at_stage("a", 3, Some(2)), OverallStatus::Hired)),
            3
        );
        assert_eq!(
            progress_score(&with_status(at_stage("a", 1, Some(0)), OverallStatus::Ghosted)),
            0
        );
        assert_eq!(
            progress_score(&with_status(at_stage("a", 1, Some(0)), OverallStatus::Rejected)),
            -1
        );
    }

    #[test]
    fn badge_for_each_status() {
        let applied = record("Acme", "2024-01-01");
        assert_eq!(
            status_badge(&applied),
            StatusBadge::new("Applied", BadgeStyle::Applied)
        );
        assert_eq!(
            status_badge(&with_status(applied.clone(), OverallStatus::Hired)),
            StatusBadge::new("Hired", BadgeStyle::Hired)
        );
        assert_eq!(
            status_badge(&with_status(applied.clone(), OverallStatus::Rejected)),
            StatusBadge::new("Rejected", BadgeStyle::Rejected)
        );
        assert_eq!(
            status_badge(&with_status(applied, OverallStatus::Ghosted)),
            StatusBadge::new("No Response", BadgeStyle::Muted)
        );
    }

    #[test]
    fn badge_shows_current_stage_label_past_first_stage() {
        let mut r = record("Acme", "2024-01-01");
        let mut interview = RecruitmentStage::pending("Technical Interview");
        interview.current = true;
        r.stages[0].current = false;
        r.stages.push(interview);

        let badge = status_badge(&r);

        assert_eq!(badge.label, "Technical Interview");
        assert_eq!(badge.style, BadgeStyle::Active);
    }

    #[test]
    fn badge_falls_back_when_no_stage_is_current() {
        let badge = status_badge(&at_stage("Acme", 2, None));

        assert_eq!(badge.label, "Unknown");
    }
}

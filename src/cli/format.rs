//! Output formatting for CLI display.

use std::fmt::Write;

use jiff::Timestamp;

use crate::model::{ApplicationRecord, AssetKind, EmailKit, InterviewQuestion, RecruitmentStage};
use crate::tracker::{BadgeStyle, status_badge};

fn day(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d").to_string()
}

fn marker(style: BadgeStyle) -> char {
    match style {
        BadgeStyle::Applied => '○',
        BadgeStyle::Active => '●',
        BadgeStyle::Hired => '★',
        BadgeStyle::Rejected => '✗',
        BadgeStyle::Muted => '·',
    }
}

/// One line per application for `list`.
pub(super) fn format_list_line(record: &ApplicationRecord) -> String {
    let badge = status_badge(record);
    let label = format!("[{}]", badge.label);
    format!(
        "{}  {}  {} {label:<20}  {} at {}",
        record.id.short(),
        day(record.date),
        marker(badge.style),
        record.title,
        record.company
    )
}

/// Full detail view for `show`.
pub(super) fn format_record(record: &ApplicationRecord) -> String {
    let badge = status_badge(record);
    let mut out = String::new();
    let _ = writeln!(out, "{} at {}", record.title, record.company);
    let _ = writeln!(out, "id:      {}", record.id);
    let _ = writeln!(out, "applied: {}", day(record.date));
    let _ = writeln!(out, "status:  {} ({})", badge.label, record.overall_status);
    out.push('\n');
    out.push_str("Pipeline:\n");
    out.push_str(&format_timeline(&record.stages));
    out.push('\n');
    out.push_str("Assets:\n");
    out.push_str("  ✓ resume\n");
    for kind in AssetKind::ALL {
        let mark = if record.assets.has(kind) { '✓' } else { '·' };
        let _ = writeln!(out, "  {mark} {kind}");
    }
    if !record.assets.missing().is_empty() {
        let _ = writeln!(
            out,
            "\nRun `applykit generate {} <asset>` to fill the gaps.",
            record.id.short()
        );
    }
    out
}

/// Stage list with completion markers and 1-based positions.
fn format_timeline(stages: &[RecruitmentStage]) -> String {
    let mut out = String::new();
    for (i, stage) in stages.iter().enumerate() {
        let mark = match (stage.current, stage.completed) {
            (true, _) => '●',
            (false, true) => '✓',
            (false, false) => '○',
        };
        let _ = write!(out, "  {mark} {}. {}", i + 1, stage.label);
        if let Some(date) = stage.date {
            let _ = write!(out, "  ({})", day(date));
        }
        out.push('\n');
    }
    out
}

pub(super) fn format_interview_prep(questions: &[InterviewQuestion]) -> String {
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}. {}", i + 1, q.question);
        let _ = writeln!(out, "   Why they ask: {}", q.context);
        let _ = writeln!(out, "   How to answer: {}", q.suggested_answer);
    }
    out
}

pub(super) fn format_email_kit(kit: &EmailKit) -> String {
    format!(
        "LinkedIn note:\n{}\n\nFollow-up email:\n{}\n",
        kit.linked_in_connection, kit.follow_up_email
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{GeneratedAssets, OverallStatus, RecordId};

    fn record() -> ApplicationRecord {
        let date: Timestamp = "2024-05-01T09:00:00Z".parse().unwrap();
        let mut screen = RecruitmentStage::pending("Phone Screen");
        screen.current = true;
        screen.date = Some("2024-05-10T09:00:00Z".parse().unwrap());
        let mut applied = RecruitmentStage::seed(date);
        applied.current = false;
        ApplicationRecord {
            id: RecordId("3f2a9c1e-0000-4000-8000-000000000000".into()),
            date,
            title: "Platform Engineer".into(),
            company: "Acme".into(),
            description: String::new(),
            profile_content: String::new(),
            assets: GeneratedAssets {
                resume_html: "<html></html>".into(),
                cover_letter: Some("Dear Acme".into()),
                ..Default::default()
            },
            overall_status: OverallStatus::Active,
            stages: vec![applied, screen, RecruitmentStage::pending("Onsite")],
        }
    }

    #[test]
    fn list_line_shows_short_id_badge_and_company() {
        let line = format_list_line(&record());

        assert!(line.starts_with("3f2a9c1e  2024-05-01  ● [Phone Screen]"));
        assert!(line.ends_with("Platform Engineer at Acme"));
    }

    #[test]
    fn list_line_marks_closed_applications() {
        let mut rejected = record();
        rejected.overall_status = OverallStatus::Rejected;
        let mut ghosted = record();
        ghosted.overall_status = OverallStatus::Ghosted;

        assert!(format_list_line(&rejected).contains("✗ [Rejected]"));
        assert!(format_list_line(&ghosted).contains("· [No Response]"));
    }

    #[test]
    fn timeline_marks_each_stage() {
        let timeline = format_timeline(&record().stages);

        assert_eq!(
            timeline,
            "  ✓ 1. Applied  (2024-05-01)\n  ● 2. Phone Screen  (2024-05-10)\n  ○ 3. Onsite\n"
        );
    }

    #[test]
    fn record_view_lists_asset_presence() {
        let view = format_record(&record());

        assert!(view.contains("  ✓ cover letter"));
        assert!(view.contains("  · email kit"));
    }

    #[test]
    fn interview_prep_is_numbered() {
        let text = format_interview_prep(&[InterviewQuestion {
            question: "Why Acme?".into(),
            context: "Motivation".into(),
            suggested_answer: "Mission fit".into(),
        }]);

        assert!(text.starts_with("1. Why Acme?\n"));
        assert!(text.contains("How to answer: Mission fit"));
    }
}

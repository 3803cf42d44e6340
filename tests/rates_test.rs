//! Claim pricing.

mod common;

use remuneration::form::SectionKind;
use remuneration::form::rows::{
    OtherRemuneration, PaperSection, PracticalExam, QuestionModeration, QuestionPreparation,
    ScriptEvaluation, ScriptType,
};
use remuneration::models::remuneration::{RemunerationDetails, rates};
use common::*;

#[test]
fn test_paper_preparation_rates() {
    let mut row = QuestionPreparation::default();
    assert_eq!(rates::preparation(&row), rates::FULL_PAPER);
    row.section_type = PaperSection::Half;
    assert_eq!(rates::preparation(&row), rates::HALF_PAPER);
}

#[test]
fn test_moderation_is_shared_by_team() {
    let row = QuestionModeration {
        course_code: "CSE101".to_string(),
        question_count: 6,
        team_member_count: 3,
    };
    assert_eq!(rates::moderation(&row), 200.0);

    let nobody = QuestionModeration {
        team_member_count: 0,
        ..row
    };
    assert_eq!(rates::moderation(&nobody), 0.0);
}

#[test]
fn test_script_rates_depend_on_type() {
    let mut row = ScriptEvaluation {
        course_code: "CSE101".to_string(),
        script_type: ScriptType::Final,
        script_count: 10,
    };
    assert_eq!(rates::script_evaluation(&row), 150.0);
    row.script_type = ScriptType::Incourse;
    assert_eq!(rates::script_evaluation(&row), 50.0);
    row.script_type = ScriptType::Presentation;
    assert_eq!(rates::script_evaluation(&row), 100.0);
}

#[test]
fn test_practical_counts_student_days() {
    let row = PracticalExam {
        course_code: "CSE102".to_string(),
        student_count: 40,
        day_count: 2,
    };
    assert_eq!(rates::practical(&row), 160.0);
}

#[test]
fn test_other_is_paged_or_flat() {
    let mut row = OtherRemuneration {
        details: "Stencils".to_string(),
        page_count: Some(12),
        ..OtherRemuneration::default()
    };
    assert_eq!(rates::other(&row), 120.0);
    row.page_count = None;
    assert_eq!(rates::other(&row), rates::OTHER_FLAT);
}

#[test]
fn test_total_sums_every_section() {
    let details = sample_details();
    let by_section: f64 = SectionKind::ALL
        .iter()
        .map(|k| rates::section_total(&details, *k))
        .sum();

    assert_eq!(rates::section_total(&details, SectionKind::ScriptEvaluations), 600.0);
    assert_eq!(rates::section_total(&details, SectionKind::Tabulations), 0.0);
    assert_eq!(rates::total(&details), 1520.0);
    assert_eq!(rates::total(&details), by_section);
}

#[test]
fn test_empty_claim_totals_zero() {
    let details = RemunerationDetails::default();
    assert!(details.is_empty());
    assert_eq!(rates::total(&details), 0.0);
}

#[test]
fn test_course_codes_are_distinct_and_sorted() {
    let details = sample_details();
    assert_eq!(details.row_count(), 4);
    assert_eq!(details.course_codes(), vec!["CSE101", "CSE102"]);
}

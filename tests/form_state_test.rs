//! The form aggregate: hydration, header resolution, posted fields and assembly.

mod common;

use remuneration::form::rows::{FieldError, ScriptType, VivaExam};
use remuneration::form::{AssemblyError, FormDraft, FormState, MAX_ROWS, SectionKind, assemble};
use common::*;

fn teachers() -> Vec<remuneration::models::teacher::Teacher> {
    vec![teacher_fixture("T001", "Alice Rahman"), teacher_fixture("T002", "Babul Hossain")]
}

fn post(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Hydration
// ---------------------------------------------------------------------------

#[test]
fn test_new_form_has_one_row_per_section() {
    let state = FormState::new();
    for kind in SectionKind::ALL {
        assert_eq!(state.section_len(kind), 1, "{kind:?}");
    }
    assert_eq!(state.teacher_id(), "");
    assert!(state.semester().is_none());
    assert!(!state.year_locked());
}

#[test]
fn test_hydrate_replaces_only_provided_sections() {
    let draft: FormDraft = serde_json::from_str(
        r#"{"vivaExams": [
                {"course_code": "CSE101", "student_count": 30},
                {"course_code": "CSE102", "student_count": 25}
            ]}"#,
    )
    .expect("parse draft");

    let state = FormState::hydrate(draft);
    assert_eq!(state.viva_exams.len(), 2);
    assert_eq!(state.viva_exams.rows()[1].student_count, 25);
    assert_eq!(state.tabulations.len(), 1);
    assert_eq!(state.question_preparations.len(), 1);
}

#[test]
fn test_hydrate_with_empty_list_keeps_default_row() {
    let draft = FormDraft {
        tabulations: Some(Vec::new()),
        ..FormDraft::default()
    };
    let state = FormState::hydrate(draft);
    assert_eq!(state.tabulations.len(), 1);
}

#[test]
fn test_teacher_waits_for_master_data() {
    let draft = FormDraft {
        teacher_id: Some("T002".to_string()),
        ..FormDraft::default()
    };
    let mut state = FormState::hydrate(draft);
    assert_eq!(state.teacher_id(), "");
    assert!(!state.master_loaded());

    let request = state.apply_master_data(&teachers());
    assert!(request.is_none());
    assert_eq!(state.teacher_id(), "T002");
    assert_eq!(state.teacher().map(|t| t.name.as_str()), Some("Babul Hossain"));
}

#[test]
fn test_set_teacher_before_master_data_is_queued() {
    let mut state = FormState::new();
    state.set_teacher("T001");
    assert_eq!(state.teacher_id(), "");

    state.apply_master_data(&teachers());
    assert_eq!(state.teacher_id(), "T001");
    assert!(state.teacher().is_some());
}

#[test]
fn test_unknown_teacher_keeps_id_without_record() {
    let mut state = FormState::new();
    state.apply_master_data(&teachers());
    state.set_teacher("T999");
    assert_eq!(state.teacher_id(), "T999");
    assert!(state.teacher().is_none());

    state.set_teacher("");
    assert_eq!(state.teacher_id(), "");
}

#[test]
fn test_hydrated_semester_yields_request() {
    let draft = FormDraft {
        semester_name: Some(SEMESTER.to_string()),
        exam_year: Some(YEAR),
        ..FormDraft::default()
    };
    let mut state = FormState::hydrate(draft);
    let request = state.apply_master_data(&teachers()).expect("semester request");
    assert_eq!(request.semester_name, SEMESTER);
    assert_eq!(request.exam_year, YEAR);
    assert!(request.token > 0);
}

// ---------------------------------------------------------------------------
// Semester resolution
// ---------------------------------------------------------------------------

#[test]
fn test_semester_needs_name_and_year() {
    let mut state = FormState::new();
    state.apply_master_data(&teachers());
    assert!(state.set_semester_name(SEMESTER).is_none());
    assert!(state.set_exam_year(Some(YEAR)).is_some());
    assert!(state.set_exam_year(None).is_none());
}

#[test]
fn test_resolved_semester_locks_year() {
    let mut state = FormState::new();
    state.set_semester_name(SEMESTER);
    let request = state.set_exam_year(Some(YEAR)).expect("request");

    assert!(state.apply_semester(request.token, semester_fixture(7, SEMESTER, YEAR)));
    assert_eq!(state.semester().map(|s| s.id), Some(7));
    assert!(state.year_locked());
}

#[test]
fn test_stale_semester_response_is_discarded() {
    let mut state = FormState::new();
    state.set_semester_name(SEMESTER);
    let first = state.set_exam_year(Some(2023)).expect("first");
    let second = state.set_exam_year(Some(2024)).expect("second");
    assert_ne!(first.token, second.token);

    assert!(!state.apply_semester(first.token, semester_fixture(1, SEMESTER, 2023)));
    assert!(state.semester().is_none());

    assert!(state.apply_semester(second.token, semester_fixture(2, SEMESTER, 2024)));
    assert_eq!(state.exam_year(), Some(2024));
}

#[test]
fn test_zero_token_is_never_accepted() {
    let mut state = FormState::new();
    assert!(!state.apply_semester(0, semester_fixture(1, SEMESTER, YEAR)));
}

#[test]
fn test_changing_header_unlocks_year() {
    let mut state = FormState::new();
    state.set_semester_name(SEMESTER);
    let request = state.set_exam_year(Some(YEAR)).expect("request");
    state.apply_semester(request.token, semester_fixture(3, SEMESTER, YEAR));

    state.set_semester_name("2nd Year 1st Semester");
    assert!(state.semester().is_none());
    assert!(!state.year_locked());
}

// ---------------------------------------------------------------------------
// Posted fields
// ---------------------------------------------------------------------------

#[test]
fn test_apply_post_grows_sections_to_posted_rows() {
    let mut state = FormState::new();
    state.apply_master_data(&teachers());

    let outcome = state.apply_post(&post(&[
        ("csrf_token", "ignored"),
        ("action", "refresh"),
        ("teacher_id", "T001"),
        ("script_evaluations.0.course_code", "CSE101"),
        ("script_evaluations.0.script_type", "Assignment"),
        ("script_evaluations.2.course_code", "CSE103"),
        ("script_evaluations.2.script_count", "12"),
    ]));

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert!(outcome.semester_request.is_none());
    assert_eq!(state.teacher_id(), "T001");
    assert_eq!(state.script_evaluations.len(), 3);
    assert_eq!(state.script_evaluations.rows()[0].script_type, ScriptType::Assignment);
    assert_eq!(state.script_evaluations.rows()[1].course_code, "");
    assert_eq!(state.script_evaluations.rows()[2].script_count, 12);
}

#[test]
fn test_apply_post_rejects_rows_past_cap() {
    let mut state = FormState::new();
    state.apply_master_data(&[]);

    let outcome = state.apply_post(&post(&[
        ("viva_exams.5000000.student_count", "1"),
        ("viva_exams.0.course_code", "CSE101"),
    ]));

    assert_eq!(state.viva_exams.len(), 1);
    assert_eq!(state.viva_exams.rows()[0].course_code, "CSE101");
    assert_eq!(
        outcome.errors,
        vec![FieldError::RowOutOfRange { index: 5_000_000, len: 1 }]
    );

    let last = format!("tabulations.{}.student_count", MAX_ROWS - 1);
    let outcome = state.apply_post(&post(&[(last.as_str(), "2")]));
    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(state.tabulations.len(), MAX_ROWS);
}

#[test]
fn test_apply_post_collects_field_errors() {
    let mut state = FormState::new();
    state.apply_master_data(&teachers());

    let outcome = state.apply_post(&post(&[
        ("viva_exams.0.student_count", "lots"),
        ("vivas.0.student_count", "3"),
        ("viva_exams.0.course_code", "CSE101"),
        ("exam_year", "twenty"),
    ]));

    assert_eq!(outcome.errors.len(), 3);
    assert!(outcome.errors.contains(&FieldError::UnknownSection("vivas".to_string())));
    assert_eq!(state.viva_exams.rows()[0].course_code, "CSE101");
    assert_eq!(state.viva_exams.rows()[0].student_count, 0);
}

#[test]
fn test_apply_post_returns_latest_semester_request() {
    let mut state = FormState::new();
    state.apply_master_data(&teachers());

    let outcome = state.apply_post(&post(&[
        ("semester_name", SEMESTER),
        ("exam_year", "2024"),
    ]));
    let request = outcome.semester_request.expect("request");
    assert_eq!(request.exam_year, 2024);
    assert!(state.apply_semester(request.token, semester_fixture(4, SEMESTER, 2024)));
}

#[test]
fn test_apply_field_ignores_unrelated_keys() {
    let mut state = FormState::new();
    assert_eq!(state.apply_field("action", "submit"), Ok(None));
    assert_eq!(state.apply_field("csrf_token", "abc"), Ok(None));
}

#[test]
fn test_state_level_row_operations() {
    let mut state = FormState::new();
    state.add_row(SectionKind::Tabulations);
    assert_eq!(state.section_len(SectionKind::Tabulations), 2);
    assert!(state.remove_row(SectionKind::Tabulations, 0));
    assert!(!state.remove_row(SectionKind::Tabulations, 0));

    let err = state
        .update_field(SectionKind::PracticalExams, 4, "day_count", "2")
        .unwrap_err();
    assert_eq!(err, FieldError::RowOutOfRange { index: 4, len: 1 });
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

fn ready_state() -> FormState {
    let mut state = FormState::new();
    state.apply_master_data(&teachers());
    state.set_teacher("T001");
    state.set_semester_name(SEMESTER);
    let request = state.set_exam_year(Some(YEAR)).expect("request");
    state.apply_semester(request.token, semester_fixture(11, SEMESTER, YEAR));
    state
}

#[test]
fn test_assemble_requires_teacher_first() {
    let state = FormState::new();
    assert_eq!(assemble(&state).unwrap_err(), AssemblyError::MissingTeacher);
    assert_eq!(AssemblyError::MissingTeacher.to_string(), "Please select a teacher");
}

#[test]
fn test_assemble_requires_semester() {
    let mut state = FormState::new();
    state.apply_master_data(&teachers());
    state.set_teacher("T002");
    assert_eq!(assemble(&state).unwrap_err(), AssemblyError::MissingSemester);
}

#[test]
fn test_assemble_keeps_only_complete_rows() {
    let mut state = ready_state();
    state.viva_exams.add_row();
    state.viva_exams.update_field(1, "course_code", "CSE102").expect("code");
    state.viva_exams.update_field(1, "student_count", "18").expect("count");
    state.other_remunerations.update_field(0, "page_count", "3").expect("pages");

    let submission = assemble(&state).expect("assemble");
    assert_eq!(submission.teacher_id, "T001");
    assert_eq!(submission.exam_semester_id, 11);
    assert_eq!(
        submission.details.viva_exams,
        vec![VivaExam {
            course_code: "CSE102".to_string(),
            student_count: 18,
        }]
    );
    assert!(submission.details.other_remunerations.is_empty());
    assert_eq!(submission.details.row_count(), 1);
}

#[test]
fn test_submission_payload_is_flat() {
    let state = ready_state();
    let submission = assemble(&state).expect("assemble");
    let json = serde_json::to_value(&submission).expect("json");
    assert_eq!(json["teacher_id"], "T001");
    assert_eq!(json["exam_semester_id"], 11);
    assert!(json["viva_exams"].as_array().expect("array").is_empty());
}

#[test]
fn test_draft_round_trips_stored_details() {
    let draft = FormDraft::from(sample_details());
    assert!(draft.tabulations.is_none());
    let state = FormState::hydrate(draft);
    assert_eq!(state.complete_details(), sample_details());
}

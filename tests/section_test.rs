//! Repeatable claim sections and the row field parsers.

use remuneration::form::{MAX_ROWS, Section};
use remuneration::form::rows::{
    ClaimRow, FieldError, OtherKind, OtherRemuneration, PaperSection, QuestionModeration,
    QuestionPreparation, ScriptEvaluation, ScriptType, VivaExam,
};

#[test]
fn test_new_section_has_one_default_row() {
    let section: Section<VivaExam> = Section::new();
    assert_eq!(section.len(), 1);
    assert_eq!(section.rows()[0], VivaExam::default());
    assert!(!section.can_remove());
}

#[test]
fn test_default_rows_are_zeroed() {
    let prep = QuestionPreparation::default();
    assert_eq!(prep.course_code, "");
    assert_eq!(prep.section_type, PaperSection::Full);

    let eval = ScriptEvaluation::default();
    assert_eq!(eval.script_type, ScriptType::Final);
    assert_eq!(eval.script_count, 0);

    let other = OtherRemuneration::default();
    assert_eq!(other.remuneration_type, OtherKind::ExamCommitteeHonorium);
    assert_eq!(other.page_count, None);
}

#[test]
fn test_add_and_remove_rows() {
    let mut section: Section<VivaExam> = Section::new();
    section.add_row();
    section.add_row();
    assert_eq!(section.len(), 3);

    section.update_field(1, "course_code", "CSE201").expect("update");
    assert!(section.remove_row(0));
    assert_eq!(section.len(), 2);
    assert_eq!(section.rows()[0].course_code, "CSE201");
}

#[test]
fn test_add_row_stops_at_cap() {
    let mut section: Section<VivaExam> = Section::new();
    while section.add_row() {}
    assert_eq!(section.len(), MAX_ROWS);
    assert!(!section.add_row());
    assert_eq!(section.len(), MAX_ROWS);
}

#[test]
fn test_remove_last_row_is_declined() {
    let mut section: Section<VivaExam> = Section::new();
    section.update_field(0, "course_code", "CSE101").expect("update");

    assert!(!section.remove_row(0));
    assert_eq!(section.len(), 1);
    assert_eq!(section.rows()[0].course_code, "CSE101");
}

#[test]
fn test_remove_out_of_range_is_declined() {
    let mut section: Section<VivaExam> = Section::new();
    section.add_row();
    assert!(!section.remove_row(5));
    assert_eq!(section.len(), 2);
}

#[test]
fn test_update_out_of_range_is_an_error() {
    let mut section: Section<VivaExam> = Section::new();
    let err = section.update_field(3, "student_count", "12").unwrap_err();
    assert_eq!(err, FieldError::RowOutOfRange { index: 3, len: 1 });
    assert_eq!(section.rows()[0], VivaExam::default());
}

#[test]
fn test_update_touches_only_named_field() {
    let mut section: Section<QuestionModeration> = Section::new();
    section.update_field(0, "course_code", "CSE101").expect("code");
    section.update_field(0, "question_count", "8").expect("count");

    let row = &section.rows()[0];
    assert_eq!(row.course_code, "CSE101");
    assert_eq!(row.question_count, 8);
    assert_eq!(row.team_member_count, 0);
}

#[test]
fn test_invalid_values_leave_row_unchanged() {
    let mut section: Section<ScriptEvaluation> = Section::new();
    section.update_field(0, "script_count", "25").expect("count");

    let err = section.update_field(0, "script_count", "many").unwrap_err();
    assert!(matches!(err, FieldError::InvalidValue { .. }));
    let err = section.update_field(0, "script_count", "-3").unwrap_err();
    assert!(matches!(err, FieldError::InvalidValue { .. }));
    let err = section.update_field(0, "script_type", "Oral").unwrap_err();
    assert!(matches!(err, FieldError::InvalidValue { .. }));

    assert_eq!(section.rows()[0].script_count, 25);
    assert_eq!(section.rows()[0].script_type, ScriptType::Final);
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut section: Section<VivaExam> = Section::new();
    let err = section.update_field(0, "day_count", "2").unwrap_err();
    assert_eq!(err, FieldError::UnknownField("day_count".to_string()));
}

#[test]
fn test_blank_count_means_zero() {
    let mut row = VivaExam::default();
    row.set_field("student_count", "14").expect("set");
    row.set_field("student_count", "  ").expect("blank");
    assert_eq!(row.student_count, 0);
}

#[test]
fn test_choice_fields_match_case_insensitively() {
    let mut row = ScriptEvaluation::default();
    row.set_field("script_type", "incourse").expect("set");
    assert_eq!(row.script_type, ScriptType::Incourse);

    let mut other = OtherRemuneration::default();
    other.set_field("remuneration_type", "Question Setter").expect("set");
    assert_eq!(other.remuneration_type, OtherKind::QuestionSetter);
}

#[test]
fn test_page_count_zero_clears_pages() {
    let mut other = OtherRemuneration::default();
    other.set_field("page_count", "7").expect("set");
    assert_eq!(other.page_count, Some(7));
    other.set_field("page_count", "0").expect("clear");
    assert_eq!(other.page_count, None);
}

#[test]
fn test_completeness_rules() {
    let mut viva = VivaExam::default();
    assert!(!viva.is_complete());
    viva.course_code = "CSE101".to_string();
    assert!(viva.is_complete());

    viva.course_code = "  ".to_string();
    assert!(!viva.is_complete());

    let mut other = OtherRemuneration::default();
    assert!(!other.is_complete());
    other.details = "   ".to_string();
    assert!(!other.is_complete());
    other.details = "Invigilation".to_string();
    assert!(other.is_complete());
}

#[test]
fn test_deserialized_text_is_trimmed() {
    let section: Section<ScriptEvaluation> = serde_json::from_str(
        r#"[{"course_code": "  ", "script_count": 4}, {"course_code": " CSE101 ", "script_count": 2}]"#,
    )
    .expect("parse");
    assert_eq!(section.rows()[0].course_code, "");
    assert_eq!(section.rows()[1].course_code, "CSE101");
    assert_eq!(section.complete_rows().count(), 1);

    let other: OtherRemuneration =
        serde_json::from_str(r#"{"remuneration_type": "Stencil", "details": "  "}"#).expect("parse");
    assert!(!other.is_complete());
}

#[test]
fn test_complete_rows_filters_blank_rows() {
    let mut section: Section<VivaExam> = Section::new();
    section.add_row();
    section.add_row();
    section.update_field(1, "course_code", "CSE102").expect("update");

    let complete: Vec<_> = section.complete_rows().collect();
    assert_eq!(complete.len(), 1);
    assert_eq!(complete[0].course_code, "CSE102");
}

#[test]
fn test_empty_list_deserializes_to_one_row() {
    let section: Section<VivaExam> = serde_json::from_str("[]").expect("parse");
    assert_eq!(section.len(), 1);

    let section: Section<VivaExam> =
        serde_json::from_str(r#"[{"course_code":"A"},{"course_code":"B","student_count":4}]"#)
            .expect("parse");
    assert_eq!(section.len(), 2);
    assert_eq!(section.rows()[1].student_count, 4);
}

#[test]
fn test_enum_labels_serialize_as_display_text() {
    let json = serde_json::to_string(&OtherKind::QuestionPreparationAndPrinting).expect("json");
    assert_eq!(json, "\"Question Preparation and Printing\"");
    let parsed: PaperSection = serde_json::from_str("\"Half\"").expect("parse");
    assert_eq!(parsed, PaperSection::Half);
}

//! Import review documents and the people directory.

use remuneration::errors::AppError;
use remuneration::form::FormDraft;
use remuneration::import::{
    ImportDocument, PeopleDirectory, Person, RosterDirectory, UNKNOWN_EXAMINER, tag_known,
};
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
    "semester_name": "2nd Year 1st Semester",
    "exam_year": 2024,
    "teachers_data": [
        {
            "teacher_id": "T001",
            "teacher_name": "Alice Rahman",
            "scriptEvaluations": [
                {"course_code": "CSE201", "script_type": "Final", "script_count": 45}
            ]
        },
        {
            "teacher_name": "  ",
            "vivaExams": [{"course_code": "CSE202", "student_count": 20}]
        }
    ]
}"#;

fn person(code: &str, name: &str) -> Person {
    Person {
        code: code.to_string(),
        name: name.to_string(),
        department: "CSE".to_string(),
        designation: "Lecturer".to_string(),
        is_new: false,
    }
}

#[test]
fn test_parse_document() {
    let doc = ImportDocument::parse(DOCUMENT).expect("parse");
    assert_eq!(doc.semester_name, "2nd Year 1st Semester");
    assert_eq!(doc.exam_year, 2024);
    assert_eq!(doc.teachers_data.len(), 2);
    let evals = doc.teachers_data[0].script_evaluations.as_ref().expect("evaluations");
    assert_eq!(evals[0].script_count, 45);
}

#[test]
fn test_parse_rejects_bad_documents() {
    let err = ImportDocument::parse("[1, 2]").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = ImportDocument::parse(r#"{"semester_name": " ", "exam_year": 2024}"#).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_cards_name_each_examiner() {
    let doc = ImportDocument::parse(DOCUMENT).expect("parse");
    let cards = doc.cards().expect("cards");
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "Alice Rahman");
    assert_eq!(cards[0].teacher_id, "T001");
    assert_eq!(cards[1].title, UNKNOWN_EXAMINER);
    assert_eq!(cards[1].teacher_id, "");
    assert_eq!(cards[1].index, 1);
}

#[test]
fn test_card_draft_reproduces_the_entry() {
    let doc = ImportDocument::parse(DOCUMENT).expect("parse");
    let cards = doc.cards().expect("cards");
    let draft: FormDraft = serde_json::from_str(&cards[0].draft_json).expect("draft");
    assert_eq!(draft, doc.teachers_data[0]);
}

#[test]
fn test_roster_search_is_case_insensitive() {
    let roster = RosterDirectory::new(vec![
        person("T001", "Alice Rahman"),
        person("T002", "Babul Hossain"),
        person("T003", "Rahima Akter"),
    ]);
    let found: Vec<String> = roster.search("RAHM").into_iter().map(|p| p.code).collect();
    assert_eq!(found, vec!["T001"]);
    let found = roster.search("ra");
    assert_eq!(found.len(), 2);
    assert!(roster.search("   ").is_empty());
}

#[test]
fn test_tag_known_marks_new_people() {
    let people = vec![person("T001", "Alice Rahman"), person("T009", "New Person")];
    let tagged = tag_known(people, |code| code == "T001");
    assert!(!tagged[0].is_new);
    assert!(tagged[1].is_new);
}

#[test]
fn test_roster_file_loading() {
    let dir = TempDir::new().expect("temp dir");
    let missing = RosterDirectory::load(&dir.path().join("absent.json")).expect("missing roster");
    assert!(missing.is_empty());

    let path = dir.path().join("people.json");
    std::fs::write(
        &path,
        r#"[{"code": "T001", "name": "Alice Rahman"}, {"code": "T002", "name": "Babul Hossain", "designation": "Professor"}]"#,
    )
    .expect("write roster");
    let roster = RosterDirectory::load(&path).expect("roster");
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.search("babul")[0].designation, "Professor");

    std::fs::write(&path, "not json").expect("write");
    let err = RosterDirectory::load(&path).unwrap_err();
    assert!(matches!(err, AppError::Io(_)), "{err:?}");
}

#[test]
fn test_unreadable_roster_is_a_server_error() {
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    let dir = TempDir::new().expect("temp dir");
    let err = RosterDirectory::load(dir.path()).unwrap_err();
    assert!(matches!(err, AppError::Io(_)), "{err:?}");
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

//! Persistent draft entry store.

use remuneration::form::FormDraft;
use remuneration::form::rows::VivaExam;
use remuneration::store::EntryStore;
use tempfile::TempDir;

fn viva_draft(code: &str, students: i32) -> FormDraft {
    FormDraft {
        viva_exams: Some(vec![VivaExam {
            course_code: code.to_string(),
            student_count: students,
        }]),
        ..FormDraft::default()
    }
}

#[test]
fn test_missing_file_opens_empty() {
    let dir = TempDir::new().expect("temp dir");
    let store = EntryStore::open(dir.path().join("entries.json")).expect("open");
    assert!(store.is_empty());
    assert!(store.get("T001").is_none());
}

#[test]
fn test_put_then_get() {
    let store = EntryStore::in_memory();
    store.put("T001", viva_draft("CSE101", 30), "1st Year 1st Semester", 2024).expect("put");

    let entry = store.get("T001").expect("entry");
    assert_eq!(entry.teacher_id, "T001");
    assert_eq!(entry.semester_name, "1st Year 1st Semester");
    assert_eq!(entry.exam_year, 2024);
    assert_eq!(entry.initial_data, viva_draft("CSE101", 30));
}

#[test]
fn test_put_overwrites_without_merge() {
    let store = EntryStore::in_memory();
    let first = FormDraft {
        tabulations: Some(Vec::new()),
        ..viva_draft("CSE101", 30)
    };
    store.put("T001", first, "1st Year 1st Semester", 2024).expect("first");
    store.put("T001", viva_draft("CSE205", 12), "2nd Year 1st Semester", 2025).expect("second");

    let entry = store.get("T001").expect("entry");
    assert_eq!(entry.initial_data, viva_draft("CSE205", 12));
    assert!(entry.initial_data.tabulations.is_none());
    assert_eq!(entry.exam_year, 2025);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_entries_survive_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("entries.json");

    {
        let store = EntryStore::open(&path).expect("open");
        store.put("T002", viva_draft("CSE102", 20), "1st Year 2nd Semester", 2024).expect("put");
        store.put("T001", viva_draft("CSE101", 10), "1st Year 2nd Semester", 2024).expect("put");
    }

    let reopened = EntryStore::open(&path).expect("reopen");
    assert_eq!(reopened.len(), 2);
    let ids: Vec<String> = reopened.list().into_iter().map(|e| e.teacher_id).collect();
    assert_eq!(ids, vec!["T001", "T002"]);
    assert_eq!(
        reopened.get("T002").expect("entry").initial_data,
        viva_draft("CSE102", 20)
    );
}

#[test]
fn test_file_uses_import_key_names() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("entries.json");
    let store = EntryStore::open(&path).expect("open");
    store.put("T001", viva_draft("CSE101", 5), "1st Year 1st Semester", 2024).expect("put");

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(raw["version"], 1);
    let entry = &raw["entries"]["T001"];
    assert_eq!(entry["initialData"]["vivaExams"][0]["course_code"], "CSE101");
    assert_eq!(entry["semester_name"], "1st Year 1st Semester");
}

#[test]
fn test_remove_and_clear_persist() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("entries.json");
    let store = EntryStore::open(&path).expect("open");
    store.put("T001", FormDraft::default(), "1st Year 1st Semester", 2024).expect("put");
    store.put("T002", FormDraft::default(), "1st Year 1st Semester", 2024).expect("put");

    let removed = store.remove("T001").expect("remove");
    assert!(removed.is_some());
    assert!(store.remove("T001").expect("remove again").is_none());
    assert_eq!(EntryStore::open(&path).expect("reopen").len(), 1);

    store.clear().expect("clear");
    assert!(EntryStore::open(&path).expect("reopen").is_empty());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("entries.json");
    std::fs::write(&path, "{ not json").expect("write");
    assert!(EntryStore::open(&path).is_err());
}

#[test]
fn test_entry_fills_missing_header_from_context() {
    let store = EntryStore::in_memory();
    let entry = store
        .put("T003", viva_draft("CSE101", 9), "3rd Year 1st Semester", 2023)
        .expect("put");

    let draft = entry.into_draft();
    assert_eq!(draft.teacher_id.as_deref(), Some("T003"));
    assert_eq!(draft.semester_name.as_deref(), Some("3rd Year 1st Semester"));
    assert_eq!(draft.exam_year, Some(2023));
}

#[test]
fn test_clones_share_entries() {
    let store = EntryStore::in_memory();
    let handle = store.clone();
    handle.put("T001", FormDraft::default(), "1st Year 1st Semester", 2024).expect("put");
    assert!(store.get("T001").is_some());
    assert!(store.path().is_none());
}

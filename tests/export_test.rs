//! Generated export documents.

mod common;

use remuneration::export::{self, slug};
use remuneration::models::remuneration::{CumulativeEntry, CumulativeReport, RemunerationDetails, rates};
use common::*;

#[test]
fn test_slug_collapses_separators() {
    assert_eq!(slug("1st Year 2nd Semester"), "1st-year-2nd-semester");
    assert_eq!(slug("  T-001 / CSE  "), "t-001-cse");
    assert_eq!(slug("***"), "");
}

#[test]
fn test_lines_follow_form_order() {
    let lines = export::lines(&sample_details());
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].category, "(1) Question paper preparation");
    assert_eq!(lines[1].description, "CSE101 (Final)");
    assert_eq!(lines[1].quantity, "40 scripts");
    assert_eq!(lines[3].description, "Stencil: Final exam stencils");
    assert_eq!(lines[3].amount, 120.0);
}

#[test]
fn test_individual_statement() {
    let teacher = teacher_fixture("T001", "Alice Rahman");
    let semester = semester_fixture(5, "1st Year 2nd Semester", 2024);

    let doc = export::individual(&teacher, &semester, &sample_details()).expect("export");
    assert_eq!(doc.filename, "remuneration_t001_1st-year-2nd-semester_2024.html");
    assert_eq!(
        doc.content_disposition(),
        "attachment; filename=\"remuneration_t001_1st-year-2nd-semester_2024.html\""
    );
    assert!(doc.content_type.starts_with("text/html"));
    assert!(doc.body.contains("Alice Rahman"));
    assert!(doc.body.contains("1520.00"));
}

#[test]
fn test_individual_statement_without_claims() {
    let teacher = teacher_fixture("T002", "Babul Hossain");
    let semester = semester_fixture(5, SEMESTER, YEAR);
    let doc = export::individual(&teacher, &semester, &RemunerationDetails::default()).expect("export");
    assert!(doc.body.contains("No claims recorded"));
}

#[test]
fn test_cumulative_report_document() {
    let details = sample_details();
    let total = rates::total(&details);
    let report = CumulativeReport {
        semester: semester_fixture(9, SEMESTER, YEAR),
        entries: vec![
            CumulativeEntry {
                teacher: teacher_fixture("T001", "Alice Rahman"),
                details: details.clone(),
                total,
            },
            CumulativeEntry {
                teacher: teacher_fixture("T002", "Babul Hossain"),
                details,
                total,
            },
        ],
        grand_total: total * 2.0,
    };

    let doc = export::cumulative(&report).expect("export");
    assert_eq!(doc.filename, "cumulative_1st-year-1st-semester_2024.html");
    assert!(doc.body.contains("Babul Hossain"));
    assert!(doc.body.contains("3040.00"));
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An examination semester, unique by (`semester_name`, `year`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExamSemester {
    pub id: i64,
    pub year: i32,
    pub semester_name: String,
    pub exam_start_date: Option<NaiveDate>,
    pub exam_end_date: Option<NaiveDate>,
    pub result_publish_date: Option<NaiveDate>,
    pub chairman_id: Option<String>,
}

impl ExamSemester {
    pub fn label(&self) -> String {
        format!("{} - {}", self.semester_name, self.year)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSemester {
    pub year: i32,
    pub semester_name: String,
    #[serde(default)]
    pub exam_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub exam_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub result_publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub chairman_id: Option<String>,
}

/// The semester names offered by the form and the import page.
pub const SEMESTER_NAMES: &[&str] = &[
    "1st Year 1st Semester",
    "1st Year 2nd Semester",
    "2nd Year 1st Semester",
    "2nd Year 2nd Semester",
    "3rd Year 1st Semester",
    "3rd Year 2nd Semester",
    "4th Year 1st Semester",
    "4th Year 2nd Semester",
];

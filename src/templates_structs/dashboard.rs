use askama::Template;

use crate::models::remuneration::CumulativeReport;
use crate::models::semester::ExamSemester;
use crate::models::teacher::Teacher;
use crate::store::Entry;

use super::PageContext;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub semesters: Vec<ExamSemester>,
    pub selected_semester_id: i64,
    pub report: Option<CumulativeReport>,
    pub pending_entries: Vec<Entry>,
}

pub struct TeacherSemesterRow {
    pub semester: ExamSemester,
    pub line_count: usize,
    pub total: f64,
}

#[derive(Template)]
#[template(path = "teacher_dashboard.html")]
pub struct TeacherDashboardTemplate {
    pub ctx: PageContext,
    pub teacher: Teacher,
    pub rows: Vec<TeacherSemesterRow>,
    pub grand_total: f64,
}

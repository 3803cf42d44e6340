use askama::Template;

use crate::import::{Person, ReviewCard};
use crate::models::semester::SEMESTER_NAMES;

use super::PageContext;

#[derive(Template)]
#[template(path = "import.html")]
pub struct ImportTemplate {
    pub ctx: PageContext,
    pub query: String,
    pub searched: bool,
    pub results: Vec<Person>,
}

#[derive(Template)]
#[template(path = "excel_import.html")]
pub struct ExcelImportTemplate {
    pub ctx: PageContext,
    pub error: Option<String>,
    pub semester_names: &'static [&'static str],
    pub years: Vec<i32>,
    pub semester_name: String,
    pub exam_year: i32,
    pub cards: Vec<ReviewCard>,
}

impl ExcelImportTemplate {
    pub fn upload(ctx: PageContext, years: Vec<i32>) -> Self {
        Self {
            ctx,
            error: None,
            semester_names: SEMESTER_NAMES,
            years,
            semester_name: String::new(),
            exam_year: 0,
            cards: Vec::new(),
        }
    }

    pub fn semester_selected(&self, name: &str) -> bool {
        self.semester_name == name
    }
}

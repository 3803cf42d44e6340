use askama::Template;

use crate::form::rows::{OtherKind, PaperSection, ScriptType};
use crate::form::{FormState, SectionKind};
use crate::models::course::Course;
use crate::models::semester::SEMESTER_NAMES;

use super::PageContext;

/// Which claim form is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Any teacher may be selected.
    Admin,
    /// Locked to the logged-in teacher.
    Teacher,
}

impl FormMode {
    pub fn action_url(&self) -> &'static str {
        match self {
            FormMode::Admin => "/remuneration-form",
            FormMode::Teacher => "/teacher-remuneration-form",
        }
    }

    pub fn done_url(&self) -> &'static str {
        match self {
            FormMode::Admin => "/dashboard",
            FormMode::Teacher => "/teacher-dashboard",
        }
    }
}

#[derive(Template)]
#[template(path = "remuneration_form.html")]
pub struct RemunerationFormTemplate {
    pub ctx: PageContext,
    pub mode: FormMode,
    pub form: FormState,
    pub courses: Vec<Course>,
    pub errors: Vec<String>,
    pub total: f64,
    pub years: Vec<i32>,
    pub semester_names: &'static [&'static str],
    pub paper_sections: &'static [PaperSection],
    pub script_types: &'static [ScriptType],
    pub other_kinds: &'static [OtherKind],
}

impl RemunerationFormTemplate {
    pub fn new(ctx: PageContext, mode: FormMode, form: FormState, courses: Vec<Course>, years: Vec<i32>) -> Self {
        Self {
            ctx,
            mode,
            form,
            courses,
            errors: Vec::new(),
            total: 0.0,
            years,
            semester_names: SEMESTER_NAMES,
            paper_sections: PaperSection::ALL,
            script_types: ScriptType::ALL,
            other_kinds: OtherKind::ALL,
        }
    }

    pub fn teacher_locked(&self) -> bool {
        self.mode == FormMode::Teacher
    }

    pub fn exam_year_value(&self) -> String {
        self.form.exam_year().map(|y| y.to_string()).unwrap_or_default()
    }

    pub fn semester_selected(&self, name: &str) -> bool {
        self.form.semester_name() == name
    }

    pub fn title(&self, key: &str) -> &'static str {
        SectionKind::from_key(key).map(|k| k.title()).unwrap_or("")
    }
}

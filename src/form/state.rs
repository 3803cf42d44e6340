use serde::{Deserialize, Serialize};

use crate::models::remuneration::RemunerationDetails;
use crate::models::semester::ExamSemester;
use crate::models::teacher::Teacher;
use super::rows::*;
use super::section::Section;

/// The eight claim categories, in the order the form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    QuestionPreparations,
    QuestionModerations,
    ScriptEvaluations,
    PracticalExams,
    VivaExams,
    Tabulations,
    AnswerSheetReviews,
    OtherRemunerations,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::QuestionPreparations,
        SectionKind::QuestionModerations,
        SectionKind::ScriptEvaluations,
        SectionKind::PracticalExams,
        SectionKind::VivaExams,
        SectionKind::Tabulations,
        SectionKind::AnswerSheetReviews,
        SectionKind::OtherRemunerations,
    ];

    /// Key used in form posts and in the submission payload.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::QuestionPreparations => "question_preparations",
            SectionKind::QuestionModerations => "question_moderations",
            SectionKind::ScriptEvaluations => "script_evaluations",
            SectionKind::PracticalExams => "practical_exams",
            SectionKind::VivaExams => "viva_exams",
            SectionKind::Tabulations => "tabulations",
            SectionKind::AnswerSheetReviews => "answer_sheet_reviews",
            SectionKind::OtherRemunerations => "other_remunerations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::QuestionPreparations => "(1) Question paper preparation",
            SectionKind::QuestionModerations => "(2) Question paper moderation",
            SectionKind::ScriptEvaluations => "(3) Script evaluation",
            SectionKind::PracticalExams => "(4) Practical examination",
            SectionKind::VivaExams => "(5) Viva examination",
            SectionKind::Tabulations => "(6) Tabulation",
            SectionKind::AnswerSheetReviews => "(7) Answer sheet review",
            SectionKind::OtherRemunerations => "Other remunerations",
        }
    }

    pub fn from_key(key: &str) -> Option<SectionKind> {
        SectionKind::ALL.iter().copied().find(|k| k.key() == key)
    }
}

/// Partial form content, as produced by the import flow and kept in the entry store.
///
/// Section lists use the camelCase keys of the import document; header fields
/// keep their snake_case names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    #[serde(rename = "teacher_id", default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(rename = "teacher_name", default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(rename = "semester_name", default, skip_serializing_if = "Option::is_none")]
    pub semester_name: Option<String>,
    #[serde(rename = "exam_year", default, skip_serializing_if = "Option::is_none")]
    pub exam_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_preparations: Option<Vec<QuestionPreparation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_moderations: Option<Vec<QuestionModeration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_evaluations: Option<Vec<ScriptEvaluation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practical_exams: Option<Vec<PracticalExam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viva_exams: Option<Vec<VivaExam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabulations: Option<Vec<Tabulation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_sheet_reviews: Option<Vec<AnswerSheetReview>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_remunerations: Option<Vec<OtherRemuneration>>,
}

impl From<RemunerationDetails> for FormDraft {
    /// Reopen stored claims for editing. Empty categories keep the form default.
    fn from(d: RemunerationDetails) -> Self {
        fn some<T>(rows: Vec<T>) -> Option<Vec<T>> {
            (!rows.is_empty()).then_some(rows)
        }
        FormDraft {
            question_preparations: some(d.question_preparations),
            question_moderations: some(d.question_moderations),
            script_evaluations: some(d.script_evaluations),
            practical_exams: some(d.practical_exams),
            viva_exams: some(d.viva_exams),
            tabulations: some(d.tabulations),
            answer_sheet_reviews: some(d.answer_sheet_reviews),
            other_remunerations: some(d.other_remunerations),
            ..FormDraft::default()
        }
    }
}

/// A semester lookup the caller must perform before the aggregate can cache a
/// semester. Only the response to the most recent token is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterRequest {
    pub token: u64,
    pub semester_name: String,
    pub exam_year: i32,
}

#[derive(Debug, Clone, Default)]
struct PendingHeader {
    teacher_id: Option<String>,
    semester_name: Option<String>,
    exam_year: Option<i32>,
}

/// Result of applying a whole form post to the aggregate.
#[derive(Debug, Default)]
pub struct PostOutcome {
    pub semester_request: Option<SemesterRequest>,
    pub errors: Vec<FieldError>,
}

/// The draft of one claim submission: header fields plus the eight sections.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    teacher_id: String,
    teacher: Option<Teacher>,
    semester_name: String,
    exam_year: Option<i32>,
    semester: Option<ExamSemester>,
    year_locked: bool,
    teachers: Vec<Teacher>,
    master_loaded: bool,
    pending: Option<PendingHeader>,
    last_token: u64,
    pub question_preparations: Section<QuestionPreparation>,
    pub question_moderations: Section<QuestionModeration>,
    pub script_evaluations: Section<ScriptEvaluation>,
    pub practical_exams: Section<PracticalExam>,
    pub viva_exams: Section<VivaExam>,
    pub tabulations: Section<Tabulation>,
    pub answer_sheet_reviews: Section<AnswerSheetReview>,
    pub other_remunerations: Section<OtherRemuneration>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from a partial draft. Provided section lists replace the
    /// single-row defaults; header values wait for [`FormState::apply_master_data`].
    pub fn hydrate(draft: FormDraft) -> Self {
        let mut state = Self::new();
        if let Some(rows) = draft.question_preparations {
            state.question_preparations = Section::from_rows(rows);
        }
        if let Some(rows) = draft.question_moderations {
            state.question_moderations = Section::from_rows(rows);
        }
        if let Some(rows) = draft.script_evaluations {
            state.script_evaluations = Section::from_rows(rows);
        }
        if let Some(rows) = draft.practical_exams {
            state.practical_exams = Section::from_rows(rows);
        }
        if let Some(rows) = draft.viva_exams {
            state.viva_exams = Section::from_rows(rows);
        }
        if let Some(rows) = draft.tabulations {
            state.tabulations = Section::from_rows(rows);
        }
        if let Some(rows) = draft.answer_sheet_reviews {
            state.answer_sheet_reviews = Section::from_rows(rows);
        }
        if let Some(rows) = draft.other_remunerations {
            state.other_remunerations = Section::from_rows(rows);
        }

        if draft.teacher_id.is_some() || draft.semester_name.is_some() || draft.exam_year.is_some() {
            state.pending = Some(PendingHeader {
                teacher_id: draft.teacher_id,
                semester_name: draft.semester_name,
                exam_year: draft.exam_year,
            });
        }
        state
    }

    /// Record the loaded teacher list and apply any header values that were
    /// waiting for it. Returns the semester lookup to perform, if any.
    pub fn apply_master_data(&mut self, teachers: &[Teacher]) -> Option<SemesterRequest> {
        self.teachers = teachers.to_vec();
        self.master_loaded = true;

        if !self.teacher_id.is_empty() {
            self.teacher = self.find_teacher(&self.teacher_id.clone());
        }

        let pending = self.pending.take()?;
        if let Some(id) = pending.teacher_id {
            self.set_teacher(&id);
        }
        let mut request = None;
        if let Some(name) = pending.semester_name {
            request = self.set_semester_name(&name);
        }
        if let Some(year) = pending.exam_year {
            request = self.set_exam_year(Some(year));
        }
        request
    }

    pub fn master_loaded(&self) -> bool {
        self.master_loaded
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    fn find_teacher(&self, id: &str) -> Option<Teacher> {
        self.teachers.iter().find(|t| t.id == id).cloned()
    }

    /// Select a teacher by exact id. An id missing from the list clears the
    /// resolved teacher but keeps the id; an empty id clears both.
    pub fn set_teacher(&mut self, id: &str) {
        let id = id.trim();
        if !self.master_loaded {
            self.pending.get_or_insert_with(PendingHeader::default).teacher_id = Some(id.to_string());
            return;
        }
        self.teacher_id = id.to_string();
        self.teacher = if id.is_empty() { None } else { self.find_teacher(id) };
    }

    pub fn set_semester_name(&mut self, name: &str) -> Option<SemesterRequest> {
        self.semester_name = name.trim().to_string();
        self.semester_changed()
    }

    pub fn set_exam_year(&mut self, year: Option<i32>) -> Option<SemesterRequest> {
        self.exam_year = year;
        self.semester_changed()
    }

    fn semester_changed(&mut self) -> Option<SemesterRequest> {
        self.semester = None;
        self.year_locked = false;
        let year = self.exam_year?;
        if self.semester_name.is_empty() {
            return None;
        }
        self.last_token += 1;
        Some(SemesterRequest {
            token: self.last_token,
            semester_name: self.semester_name.clone(),
            exam_year: year,
        })
    }

    /// Cache a resolved semester if `token` belongs to the latest request.
    /// Stale responses are dropped and `false` is returned.
    pub fn apply_semester(&mut self, token: u64, semester: ExamSemester) -> bool {
        if token == 0 || token != self.last_token {
            log::debug!(
                "Discarding stale semester resolution (token {token}, latest {})",
                self.last_token
            );
            return false;
        }
        self.exam_year = Some(semester.year);
        self.semester_name = semester.semester_name.clone();
        self.semester = Some(semester);
        self.year_locked = true;
        true
    }

    pub fn teacher_id(&self) -> &str {
        &self.teacher_id
    }

    pub fn teacher(&self) -> Option<&Teacher> {
        self.teacher.as_ref()
    }

    pub fn semester_name(&self) -> &str {
        &self.semester_name
    }

    pub fn exam_year(&self) -> Option<i32> {
        self.exam_year
    }

    pub fn semester(&self) -> Option<&ExamSemester> {
        self.semester.as_ref()
    }

    /// The year input becomes read-only once a semester has been resolved.
    pub fn year_locked(&self) -> bool {
        self.year_locked
    }

    /// The complete rows of every section.
    pub fn complete_details(&self) -> RemunerationDetails {
        fn complete<R: ClaimRow>(section: &Section<R>) -> Vec<R> {
            section.complete_rows().cloned().collect()
        }
        RemunerationDetails {
            question_preparations: complete(&self.question_preparations),
            question_moderations: complete(&self.question_moderations),
            script_evaluations: complete(&self.script_evaluations),
            practical_exams: complete(&self.practical_exams),
            viva_exams: complete(&self.viva_exams),
            tabulations: complete(&self.tabulations),
            answer_sheet_reviews: complete(&self.answer_sheet_reviews),
            other_remunerations: complete(&self.other_remunerations),
        }
    }

    pub fn section_len(&self, kind: SectionKind) -> usize {
        match kind {
            SectionKind::QuestionPreparations => self.question_preparations.len(),
            SectionKind::QuestionModerations => self.question_moderations.len(),
            SectionKind::ScriptEvaluations => self.script_evaluations.len(),
            SectionKind::PracticalExams => self.practical_exams.len(),
            SectionKind::VivaExams => self.viva_exams.len(),
            SectionKind::Tabulations => self.tabulations.len(),
            SectionKind::AnswerSheetReviews => self.answer_sheet_reviews.len(),
            SectionKind::OtherRemunerations => self.other_remunerations.len(),
        }
    }

    pub fn add_row(&mut self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::QuestionPreparations => self.question_preparations.add_row(),
            SectionKind::QuestionModerations => self.question_moderations.add_row(),
            SectionKind::ScriptEvaluations => self.script_evaluations.add_row(),
            SectionKind::PracticalExams => self.practical_exams.add_row(),
            SectionKind::VivaExams => self.viva_exams.add_row(),
            SectionKind::Tabulations => self.tabulations.add_row(),
            SectionKind::AnswerSheetReviews => self.answer_sheet_reviews.add_row(),
            SectionKind::OtherRemunerations => self.other_remunerations.add_row(),
        }
    }

    pub fn remove_row(&mut self, kind: SectionKind, index: usize) -> bool {
        match kind {
            SectionKind::QuestionPreparations => self.question_preparations.remove_row(index),
            SectionKind::QuestionModerations => self.question_moderations.remove_row(index),
            SectionKind::ScriptEvaluations => self.script_evaluations.remove_row(index),
            SectionKind::PracticalExams => self.practical_exams.remove_row(index),
            SectionKind::VivaExams => self.viva_exams.remove_row(index),
            SectionKind::Tabulations => self.tabulations.remove_row(index),
            SectionKind::AnswerSheetReviews => self.answer_sheet_reviews.remove_row(index),
            SectionKind::OtherRemunerations => self.other_remunerations.remove_row(index),
        }
    }

    pub fn update_field(
        &mut self,
        kind: SectionKind,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), FieldError> {
        match kind {
            SectionKind::QuestionPreparations => self.question_preparations.update_field(index, field, value),
            SectionKind::QuestionModerations => self.question_moderations.update_field(index, field, value),
            SectionKind::ScriptEvaluations => self.script_evaluations.update_field(index, field, value),
            SectionKind::PracticalExams => self.practical_exams.update_field(index, field, value),
            SectionKind::VivaExams => self.viva_exams.update_field(index, field, value),
            SectionKind::Tabulations => self.tabulations.update_field(index, field, value),
            SectionKind::AnswerSheetReviews => self.answer_sheet_reviews.update_field(index, field, value),
            SectionKind::OtherRemunerations => self.other_remunerations.update_field(index, field, value),
        }
    }

    fn ensure_row(&mut self, kind: SectionKind, index: usize) {
        match kind {
            SectionKind::QuestionPreparations => self.question_preparations.ensure_row(index),
            SectionKind::QuestionModerations => self.question_moderations.ensure_row(index),
            SectionKind::ScriptEvaluations => self.script_evaluations.ensure_row(index),
            SectionKind::PracticalExams => self.practical_exams.ensure_row(index),
            SectionKind::VivaExams => self.viva_exams.ensure_row(index),
            SectionKind::Tabulations => self.tabulations.ensure_row(index),
            SectionKind::AnswerSheetReviews => self.answer_sheet_reviews.ensure_row(index),
            SectionKind::OtherRemunerations => self.other_remunerations.ensure_row(index),
        }
    }

    /// Apply one posted field. Header keys are `teacher_id`, `semester_name`
    /// and `exam_year`; row keys look like `viva_exams.2.student_count`.
    /// Keys of neither shape are ignored.
    pub fn apply_field(&mut self, key: &str, value: &str) -> Result<Option<SemesterRequest>, FieldError> {
        match key {
            "teacher_id" => {
                self.set_teacher(value);
                return Ok(None);
            }
            "semester_name" => return Ok(self.set_semester_name(value)),
            "exam_year" => {
                let trimmed = value.trim();
                let year = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse::<i32>().map_err(|_| FieldError::InvalidValue {
                        field: "exam_year".to_string(),
                        value: value.to_string(),
                    })?)
                };
                return Ok(self.set_exam_year(year));
            }
            _ => {}
        }

        let Some((kind, index, field)) = parse_row_key(key)? else {
            return Ok(None);
        };
        self.update_field(kind, index, field, value)?;
        Ok(None)
    }

    /// Apply a complete form post. Rows referenced by the post are created as
    /// needed so that a re-posted form reproduces its row count, up to
    /// `MAX_ROWS`; keys past that report `RowOutOfRange`.
    pub fn apply_post(&mut self, fields: &[(String, String)]) -> PostOutcome {
        let mut outcome = PostOutcome::default();

        for (key, _) in fields {
            if let Ok(Some((kind, index, _))) = parse_row_key(key) {
                self.ensure_row(kind, index);
            }
        }

        for (key, value) in fields {
            match self.apply_field(key, value) {
                Ok(Some(request)) => outcome.semester_request = Some(request),
                Ok(None) => {}
                Err(e) => outcome.errors.push(e),
            }
        }
        outcome
    }
}

/// Split `section.index.field`. Keys without a dot are not row keys.
fn parse_row_key(key: &str) -> Result<Option<(SectionKind, usize, &str)>, FieldError> {
    let mut parts = key.splitn(3, '.');
    let (Some(section), Some(index), Some(field)) = (parts.next(), parts.next(), parts.next()) else {
        return Ok(None);
    };
    let kind = SectionKind::from_key(section)
        .ok_or_else(|| FieldError::UnknownSection(section.to_string()))?;
    let index = index.parse::<usize>().map_err(|_| FieldError::InvalidValue {
        field: key.to_string(),
        value: index.to_string(),
    })?;
    Ok(Some((kind, index, field)))
}

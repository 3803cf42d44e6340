use serde::{Deserialize, Serialize};

use crate::form::rows::{
    AnswerSheetReview, OtherRemuneration, PracticalExam, QuestionModeration, QuestionPreparation,
    ScriptEvaluation, Tabulation, VivaExam,
};
use crate::models::semester::ExamSemester;
use crate::models::teacher::Teacher;

/// The eight claim lists of one teacher for one semester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemunerationDetails {
    #[serde(default)]
    pub question_preparations: Vec<QuestionPreparation>,
    #[serde(default)]
    pub question_moderations: Vec<QuestionModeration>,
    #[serde(default)]
    pub script_evaluations: Vec<ScriptEvaluation>,
    #[serde(default)]
    pub practical_exams: Vec<PracticalExam>,
    #[serde(default)]
    pub viva_exams: Vec<VivaExam>,
    #[serde(default)]
    pub tabulations: Vec<Tabulation>,
    #[serde(default)]
    pub answer_sheet_reviews: Vec<AnswerSheetReview>,
    #[serde(default)]
    pub other_remunerations: Vec<OtherRemuneration>,
}

impl RemunerationDetails {
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn row_count(&self) -> usize {
        self.question_preparations.len()
            + self.question_moderations.len()
            + self.script_evaluations.len()
            + self.practical_exams.len()
            + self.viva_exams.len()
            + self.tabulations.len()
            + self.answer_sheet_reviews.len()
            + self.other_remunerations.len()
    }

    /// Distinct course codes referenced by the course-keyed lists, sorted.
    pub fn course_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .question_preparations
            .iter()
            .map(|r| r.course_code.clone())
            .chain(self.question_moderations.iter().map(|r| r.course_code.clone()))
            .chain(self.script_evaluations.iter().map(|r| r.course_code.clone()))
            .chain(self.practical_exams.iter().map(|r| r.course_code.clone()))
            .chain(self.viva_exams.iter().map(|r| r.course_code.clone()))
            .chain(self.tabulations.iter().map(|r| r.course_code.clone()))
            .chain(self.answer_sheet_reviews.iter().map(|r| r.course_code.clone()))
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }
}

/// Wire payload of a claim submission: only complete rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemunerationSubmission {
    pub teacher_id: String,
    pub exam_semester_id: i64,
    #[serde(flatten)]
    pub details: RemunerationDetails,
}

/// One line of the cumulative semester report.
#[derive(Debug, Clone, Serialize)]
pub struct CumulativeEntry {
    pub teacher: Teacher,
    pub details: RemunerationDetails,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CumulativeReport {
    pub semester: ExamSemester,
    pub entries: Vec<CumulativeEntry>,
    pub grand_total: f64,
}

//! Payment rates per claim category, in taka.

use crate::form::rows::{
    AnswerSheetReview, OtherRemuneration, PaperSection, PracticalExam, QuestionModeration,
    QuestionPreparation, ScriptEvaluation, ScriptType, Tabulation, VivaExam,
};
use crate::form::state::SectionKind;
use super::types::RemunerationDetails;

pub const FULL_PAPER: f64 = 500.0;
pub const HALF_PAPER: f64 = 250.0;
pub const MODERATION_PER_QUESTION: f64 = 100.0;
pub const PRACTICAL_PER_STUDENT_DAY: f64 = 2.0;
pub const VIVA_PER_STUDENT: f64 = 10.0;
pub const TABULATION_PER_STUDENT: f64 = 5.0;
pub const REVIEW_PER_SHEET: f64 = 20.0;
pub const OTHER_PER_PAGE: f64 = 10.0;
pub const OTHER_FLAT: f64 = 500.0;

pub fn per_script(script_type: ScriptType) -> f64 {
    match script_type {
        ScriptType::Final => 15.0,
        ScriptType::Incourse | ScriptType::Assignment => 5.0,
        ScriptType::Presentation | ScriptType::Practical => 10.0,
    }
}

pub fn preparation(row: &QuestionPreparation) -> f64 {
    match row.section_type {
        PaperSection::Full => FULL_PAPER,
        PaperSection::Half => HALF_PAPER,
    }
}

/// The moderation fee is shared by the moderation team.
pub fn moderation(row: &QuestionModeration) -> f64 {
    if row.team_member_count <= 0 {
        return 0.0;
    }
    f64::from(row.question_count) * MODERATION_PER_QUESTION / f64::from(row.team_member_count)
}

pub fn script_evaluation(row: &ScriptEvaluation) -> f64 {
    f64::from(row.script_count) * per_script(row.script_type)
}

pub fn practical(row: &PracticalExam) -> f64 {
    f64::from(row.student_count) * f64::from(row.day_count) * PRACTICAL_PER_STUDENT_DAY
}

pub fn viva(row: &VivaExam) -> f64 {
    f64::from(row.student_count) * VIVA_PER_STUDENT
}

pub fn tabulation(row: &Tabulation) -> f64 {
    f64::from(row.student_count) * TABULATION_PER_STUDENT
}

pub fn answer_sheet_review(row: &AnswerSheetReview) -> f64 {
    f64::from(row.answer_sheet_count) * REVIEW_PER_SHEET
}

/// Paged work is paid per page; everything else is a flat fee.
pub fn other(row: &OtherRemuneration) -> f64 {
    match row.page_count {
        Some(pages) if pages > 0 => f64::from(pages) * OTHER_PER_PAGE,
        _ => OTHER_FLAT,
    }
}

/// Subtotal of one category.
pub fn section_total(details: &RemunerationDetails, kind: SectionKind) -> f64 {
    match kind {
        SectionKind::QuestionPreparations => details.question_preparations.iter().map(preparation).sum(),
        SectionKind::QuestionModerations => details.question_moderations.iter().map(moderation).sum(),
        SectionKind::ScriptEvaluations => details.script_evaluations.iter().map(script_evaluation).sum(),
        SectionKind::PracticalExams => details.practical_exams.iter().map(practical).sum(),
        SectionKind::VivaExams => details.viva_exams.iter().map(viva).sum(),
        SectionKind::Tabulations => details.tabulations.iter().map(tabulation).sum(),
        SectionKind::AnswerSheetReviews => details.answer_sheet_reviews.iter().map(answer_sheet_review).sum(),
        SectionKind::OtherRemunerations => details.other_remunerations.iter().map(other).sum(),
    }
}

pub fn total(details: &RemunerationDetails) -> f64 {
    SectionKind::ALL
        .iter()
        .map(|kind| section_total(details, *kind))
        .sum()
}

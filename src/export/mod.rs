//! Print-ready HTML documents for individual claims and semester reports.

use askama::Template;

use crate::errors::AppError;
use crate::form::SectionKind;
use crate::models::remuneration::{CumulativeReport, RemunerationDetails, rates};
use crate::models::semester::ExamSemester;
use crate::models::teacher::Teacher;

/// A generated file and how to serve it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

impl ExportDocument {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// One priced claim line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLine {
    pub category: &'static str,
    pub description: String,
    pub quantity: String,
    pub amount: f64,
}

/// Lower-case, dash-separated form of `text` for use in file names.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Every claim row as a priced line, in form order.
pub fn lines(details: &RemunerationDetails) -> Vec<ExportLine> {
    let mut out = Vec::with_capacity(details.row_count());
    let title = |kind: SectionKind| kind.title();

    for r in &details.question_preparations {
        out.push(ExportLine {
            category: title(SectionKind::QuestionPreparations),
            description: r.course_code.clone(),
            quantity: format!("{} paper", r.section_type),
            amount: rates::preparation(r),
        });
    }
    for r in &details.question_moderations {
        out.push(ExportLine {
            category: title(SectionKind::QuestionModerations),
            description: r.course_code.clone(),
            quantity: format!("{} questions / {} members", r.question_count, r.team_member_count),
            amount: rates::moderation(r),
        });
    }
    for r in &details.script_evaluations {
        out.push(ExportLine {
            category: title(SectionKind::ScriptEvaluations),
            description: format!("{} ({})", r.course_code, r.script_type),
            quantity: format!("{} scripts", r.script_count),
            amount: rates::script_evaluation(r),
        });
    }
    for r in &details.practical_exams {
        out.push(ExportLine {
            category: title(SectionKind::PracticalExams),
            description: r.course_code.clone(),
            quantity: format!("{} students x {} days", r.student_count, r.day_count),
            amount: rates::practical(r),
        });
    }
    for r in &details.viva_exams {
        out.push(ExportLine {
            category: title(SectionKind::VivaExams),
            description: r.course_code.clone(),
            quantity: format!("{} students", r.student_count),
            amount: rates::viva(r),
        });
    }
    for r in &details.tabulations {
        out.push(ExportLine {
            category: title(SectionKind::Tabulations),
            description: r.course_code.clone(),
            quantity: format!("{} students", r.student_count),
            amount: rates::tabulation(r),
        });
    }
    for r in &details.answer_sheet_reviews {
        out.push(ExportLine {
            category: title(SectionKind::AnswerSheetReviews),
            description: r.course_code.clone(),
            quantity: format!("{} sheets", r.answer_sheet_count),
            amount: rates::answer_sheet_review(r),
        });
    }
    for r in &details.other_remunerations {
        out.push(ExportLine {
            category: title(SectionKind::OtherRemunerations),
            description: format!("{}: {}", r.remuneration_type, r.details),
            quantity: r
                .page_count
                .map(|p| format!("{p} pages"))
                .unwrap_or_else(|| "flat".to_string()),
            amount: rates::other(r),
        });
    }
    out
}

#[derive(Template)]
#[template(path = "export/individual.html")]
struct IndividualTemplate<'a> {
    teacher: &'a Teacher,
    semester: &'a ExamSemester,
    lines: Vec<ExportLine>,
    total: f64,
    generated_on: String,
}

pub struct CumulativeRow {
    pub teacher_id: String,
    pub name: String,
    pub designation: String,
    pub line_count: usize,
    pub total: f64,
}

#[derive(Template)]
#[template(path = "export/cumulative.html")]
struct CumulativeTemplate<'a> {
    semester: &'a ExamSemester,
    rows: Vec<CumulativeRow>,
    grand_total: f64,
    generated_on: String,
}

fn today() -> String {
    chrono::Local::now().format("%d %B %Y").to_string()
}

/// Claim statement for one teacher and semester.
pub fn individual(
    teacher: &Teacher,
    semester: &ExamSemester,
    details: &RemunerationDetails,
) -> Result<ExportDocument, AppError> {
    let body = IndividualTemplate {
        teacher,
        semester,
        lines: lines(details),
        total: rates::total(details),
        generated_on: today(),
    }
    .render()?;

    Ok(ExportDocument {
        filename: format!(
            "remuneration_{}_{}_{}.html",
            slug(&teacher.id),
            slug(&semester.semester_name),
            semester.year
        ),
        content_type: "text/html; charset=utf-8",
        body,
    })
}

/// Semester summary across all claimants.
pub fn cumulative(report: &CumulativeReport) -> Result<ExportDocument, AppError> {
    let rows = report
        .entries
        .iter()
        .map(|e| CumulativeRow {
            teacher_id: e.teacher.id.clone(),
            name: e.teacher.name.clone(),
            designation: e.teacher.designation.clone(),
            line_count: e.details.row_count(),
            total: e.total,
        })
        .collect();

    let body = CumulativeTemplate {
        semester: &report.semester,
        rows,
        grand_total: report.grand_total,
        generated_on: today(),
    }
    .render()?;

    Ok(ExportDocument {
        filename: format!(
            "cumulative_{}_{}.html",
            slug(&report.semester.semester_name),
            report.semester.year
        ),
        content_type: "text/html; charset=utf-8",
        body,
    })
}

use sqlx::{PgPool, Postgres, Transaction};

use crate::errors::AppError;
use crate::form::rows::{
    AnswerSheetReview, OtherRemuneration, PracticalExam, QuestionModeration, QuestionPreparation,
    ScriptEvaluation, Tabulation, VivaExam,
};
use crate::models::semester::{self, ExamSemester};
use crate::models::{course, teacher};
use super::rates;
use super::types::{CumulativeEntry, CumulativeReport, RemunerationDetails, RemunerationSubmission};

/// Claim tables, one per category. All share `teacher_id` and `exam_semester_id`.
const CLAIM_TABLES: [&str; 8] = [
    "question_preparations",
    "question_moderations",
    "script_evaluations",
    "practical_exams",
    "viva_exams",
    "tabulations",
    "answer_sheet_reviews",
    "other_remunerations",
];

/// Reject negative counts and other-remuneration rows without details.
pub fn validate_details(details: &RemunerationDetails) -> Vec<String> {
    let mut errors = Vec::new();
    let mut check = |label: &str, value: i32| {
        if value < 0 {
            errors.push(format!("{label} must not be negative"));
        }
    };
    for r in &details.question_moderations {
        check("Question count", r.question_count);
        check("Team member count", r.team_member_count);
    }
    for r in &details.script_evaluations {
        check("Script count", r.script_count);
    }
    for r in &details.practical_exams {
        check("Student count", r.student_count);
        check("Day count", r.day_count);
    }
    for r in &details.viva_exams {
        check("Student count", r.student_count);
    }
    for r in &details.tabulations {
        check("Student count", r.student_count);
    }
    for r in &details.answer_sheet_reviews {
        check("Answer sheet count", r.answer_sheet_count);
    }
    for r in &details.other_remunerations {
        if let Some(pages) = r.page_count {
            check("Page count", pages);
        }
    }
    if details
        .other_remunerations
        .iter()
        .any(|r| r.details.trim().is_empty())
    {
        errors.push("Other remunerations need details".to_string());
    }
    errors
}

/// Store a submission, replacing whatever the teacher had claimed for the semester.
pub async fn submit(pool: &PgPool, submission: &RemunerationSubmission) -> Result<usize, AppError> {
    if !teacher::exists(pool, &submission.teacher_id).await? {
        return Err(AppError::Validation(format!(
            "Unknown teacher {}",
            submission.teacher_id
        )));
    }
    if semester::find_by_id(pool, submission.exam_semester_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Unknown exam semester {}",
            submission.exam_semester_id
        )));
    }

    let details = &submission.details;
    let mut errors = validate_details(details);
    let missing = course::find_missing_codes(pool, &details.course_codes()).await?;
    if !missing.is_empty() {
        errors.push(format!("Unknown course code(s): {}", missing.join(", ")));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let mut tx = pool.begin().await?;
    let t = submission.teacher_id.as_str();
    let s = submission.exam_semester_id;

    for table in CLAIM_TABLES {
        sqlx::query(&format!(
            "DELETE FROM {table} WHERE teacher_id = $1 AND exam_semester_id = $2"
        ))
        .bind(t)
        .bind(s)
        .execute(&mut *tx)
        .await?;
    }

    insert_details(&mut tx, t, s, details).await?;
    tx.commit().await?;

    log::info!(
        "Stored remuneration for teacher {t}, semester {s}: {} row(s)",
        details.row_count()
    );
    Ok(details.row_count())
}

async fn insert_details(
    tx: &mut Transaction<'_, Postgres>,
    t: &str,
    s: i64,
    details: &RemunerationDetails,
) -> Result<(), AppError> {
    for r in &details.question_preparations {
        sqlx::query(
            "INSERT INTO question_preparations (teacher_id, exam_semester_id, course_code, section_type) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(t)
        .bind(s)
        .bind(&r.course_code)
        .bind(r.section_type.as_str())
        .execute(&mut **tx)
        .await?;
    }
    for r in &details.question_moderations {
        sqlx::query(
            "INSERT INTO question_moderations \
             (teacher_id, exam_semester_id, course_code, question_count, team_member_count) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(t)
        .bind(s)
        .bind(&r.course_code)
        .bind(r.question_count)
        .bind(r.team_member_count)
        .execute(&mut **tx)
        .await?;
    }
    for r in &details.script_evaluations {
        sqlx::query(
            "INSERT INTO script_evaluations \
             (teacher_id, exam_semester_id, course_code, script_type, script_count) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(t)
        .bind(s)
        .bind(&r.course_code)
        .bind(r.script_type.as_str())
        .bind(r.script_count)
        .execute(&mut **tx)
        .await?;
    }
    for r in &details.practical_exams {
        sqlx::query(
            "INSERT INTO practical_exams \
             (teacher_id, exam_semester_id, course_code, student_count, day_count) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(t)
        .bind(s)
        .bind(&r.course_code)
        .bind(r.student_count)
        .bind(r.day_count)
        .execute(&mut **tx)
        .await?;
    }
    for r in &details.viva_exams {
        sqlx::query(
            "INSERT INTO viva_exams (teacher_id, exam_semester_id, course_code, student_count) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(t)
        .bind(s)
        .bind(&r.course_code)
        .bind(r.student_count)
        .execute(&mut **tx)
        .await?;
    }
    for r in &details.tabulations {
        sqlx::query(
            "INSERT INTO tabulations (teacher_id, exam_semester_id, course_code, student_count) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(t)
        .bind(s)
        .bind(&r.course_code)
        .bind(r.student_count)
        .execute(&mut **tx)
        .await?;
    }
    for r in &details.answer_sheet_reviews {
        sqlx::query(
            "INSERT INTO answer_sheet_reviews \
             (teacher_id, exam_semester_id, course_code, answer_sheet_count) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(t)
        .bind(s)
        .bind(&r.course_code)
        .bind(r.answer_sheet_count)
        .execute(&mut **tx)
        .await?;
    }
    for r in &details.other_remunerations {
        sqlx::query(
            "INSERT INTO other_remunerations \
             (teacher_id, exam_semester_id, remuneration_type, details, page_count) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(t)
        .bind(s)
        .bind(r.remuneration_type.as_str())
        .bind(r.details.trim())
        .bind(r.page_count)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Everything a teacher claimed for a semester. Unknown combinations yield empty lists.
pub async fn find_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
    exam_semester_id: i64,
) -> Result<RemunerationDetails, AppError> {
    const WHERE: &str = "WHERE teacher_id = $1 AND exam_semester_id = $2 ORDER BY id";

    let question_preparations = sqlx::query_as::<_, (String, String)>(&format!(
        "SELECT course_code, section_type FROM question_preparations {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(course_code, section_type)| QuestionPreparation {
        course_code,
        section_type: section_type.parse().unwrap_or_default(),
    })
    .collect();

    let question_moderations = sqlx::query_as::<_, (String, i32, i32)>(&format!(
        "SELECT course_code, question_count, team_member_count FROM question_moderations {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(course_code, question_count, team_member_count)| QuestionModeration {
        course_code,
        question_count,
        team_member_count,
    })
    .collect();

    let script_evaluations = sqlx::query_as::<_, (String, String, i32)>(&format!(
        "SELECT course_code, script_type, script_count FROM script_evaluations {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(course_code, script_type, script_count)| ScriptEvaluation {
        course_code,
        script_type: script_type.parse().unwrap_or_default(),
        script_count,
    })
    .collect();

    let practical_exams = sqlx::query_as::<_, (String, i32, i32)>(&format!(
        "SELECT course_code, student_count, day_count FROM practical_exams {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(course_code, student_count, day_count)| PracticalExam {
        course_code,
        student_count,
        day_count,
    })
    .collect();

    let viva_exams = sqlx::query_as::<_, (String, i32)>(&format!(
        "SELECT course_code, student_count FROM viva_exams {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(course_code, student_count)| VivaExam { course_code, student_count })
    .collect();

    let tabulations = sqlx::query_as::<_, (String, i32)>(&format!(
        "SELECT course_code, student_count FROM tabulations {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(course_code, student_count)| Tabulation { course_code, student_count })
    .collect();

    let answer_sheet_reviews = sqlx::query_as::<_, (String, i32)>(&format!(
        "SELECT course_code, answer_sheet_count FROM answer_sheet_reviews {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(course_code, answer_sheet_count)| AnswerSheetReview {
        course_code,
        answer_sheet_count,
    })
    .collect();

    let other_remunerations = sqlx::query_as::<_, (String, String, Option<i32>)>(&format!(
        "SELECT remuneration_type, details, page_count FROM other_remunerations {WHERE}"
    ))
    .bind(teacher_id)
    .bind(exam_semester_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(remuneration_type, details, page_count)| OtherRemuneration {
        remuneration_type: remuneration_type.parse().unwrap_or_default(),
        details,
        page_count,
    })
    .collect();

    Ok(RemunerationDetails {
        question_preparations,
        question_moderations,
        script_evaluations,
        practical_exams,
        viva_exams,
        tabulations,
        answer_sheet_reviews,
        other_remunerations,
    })
}

fn union_over_claims(column: &str, filter: &str) -> String {
    CLAIM_TABLES
        .iter()
        .map(|table| format!("SELECT {column} FROM {table} WHERE {filter} = $1"))
        .collect::<Vec<_>>()
        .join(" UNION ")
}

/// Semesters in which the teacher has any claim, newest first.
pub async fn find_semesters_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<ExamSemester>, AppError> {
    let sql = format!(
        "SELECT id, year, semester_name, exam_start_date, exam_end_date, result_publish_date, chairman_id \
         FROM exam_semesters WHERE id IN ({}) ORDER BY year DESC, semester_name",
        union_over_claims("exam_semester_id", "teacher_id")
    );
    let semesters = sqlx::query_as::<_, ExamSemester>(&sql)
        .bind(teacher_id)
        .fetch_all(pool)
        .await?;
    Ok(semesters)
}

/// Teacher ids with a claim in any category for the semester, sorted.
pub async fn find_teachers_for_semester(
    pool: &PgPool,
    exam_semester_id: i64,
) -> Result<Vec<String>, AppError> {
    let sql = format!(
        "SELECT teacher_id FROM ({}) AS claimants ORDER BY teacher_id",
        union_over_claims("teacher_id", "exam_semester_id")
    );
    let ids: Vec<String> = sqlx::query_scalar(&sql)
        .bind(exam_semester_id)
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Per-teacher details and totals for one semester.
pub async fn cumulative_report(pool: &PgPool, exam_semester_id: i64) -> Result<CumulativeReport, AppError> {
    let semester = semester::find_by_id(pool, exam_semester_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut entries = Vec::new();
    for teacher_id in find_teachers_for_semester(pool, exam_semester_id).await? {
        let Some(teacher) = teacher::find_by_id(pool, &teacher_id).await? else {
            log::warn!("Claims reference missing teacher {teacher_id}");
            continue;
        };
        let details = find_for_teacher(pool, &teacher_id, exam_semester_id).await?;
        let total = rates::total(&details);
        entries.push(CumulativeEntry { teacher, details, total });
    }
    entries.sort_by(|a, b| a.teacher.name.cmp(&b.teacher.name));
    let grand_total = entries.iter().map(|e| e.total).sum();

    Ok(CumulativeReport { semester, entries, grand_total })
}

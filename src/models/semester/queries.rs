use sqlx::PgPool;

use crate::auth::validate;
use crate::errors::{AppError, is_unique_violation};
use super::types::{ExamSemester, NewSemester};

const SELECT_SEMESTER: &str = "SELECT id, year, semester_name, exam_start_date, exam_end_date, \
                                      result_publish_date, chairman_id \
                               FROM exam_semesters";

/// All semesters, newest year first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<ExamSemester>, AppError> {
    let sql = format!("{SELECT_SEMESTER} ORDER BY year DESC, semester_name");
    let semesters = sqlx::query_as::<_, ExamSemester>(&sql).fetch_all(pool).await?;
    Ok(semesters)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ExamSemester>, AppError> {
    let sql = format!("{SELECT_SEMESTER} WHERE id = $1");
    let semester = sqlx::query_as::<_, ExamSemester>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(semester)
}

pub async fn find_by_name_and_year(
    pool: &PgPool,
    semester_name: &str,
    year: i32,
) -> Result<Option<ExamSemester>, AppError> {
    let sql = format!("{SELECT_SEMESTER} WHERE semester_name = $1 AND year = $2");
    let semester = sqlx::query_as::<_, ExamSemester>(&sql)
        .bind(semester_name)
        .bind(year)
        .fetch_optional(pool)
        .await?;
    Ok(semester)
}

/// Check the business rules for an explicitly created semester.
pub fn validate_semester(new: &NewSemester) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_year(new.year));
    if new.semester_name.trim().is_empty() {
        errors.push("Semester name is required".to_string());
    }
    if let (Some(start), Some(end)) = (new.exam_start_date, new.exam_end_date) {
        if start > end {
            errors.push("Exam start date must be before end date".to_string());
        }
    }
    if let (Some(end), Some(publish)) = (new.exam_end_date, new.result_publish_date) {
        if end > publish {
            errors.push("Result publish date must be after exam end date".to_string());
        }
    }
    errors
}

pub async fn create(pool: &PgPool, new: &NewSemester) -> Result<ExamSemester, AppError> {
    let errors = validate_semester(new);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let result = sqlx::query_as::<_, ExamSemester>(
        "INSERT INTO exam_semesters \
             (year, semester_name, exam_start_date, exam_end_date, result_publish_date, chairman_id) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, year, semester_name, exam_start_date, exam_end_date, \
                   result_publish_date, chairman_id",
    )
    .bind(new.year)
    .bind(new.semester_name.trim())
    .bind(new.exam_start_date)
    .bind(new.exam_end_date)
    .bind(new.result_publish_date)
    .bind(&new.chairman_id)
    .fetch_one(pool)
    .await;

    match result {
        Ok(created) => Ok(created),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Semester {} {} already exists",
            new.semester_name.trim(),
            new.year
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Fetch the semester for (name, year), creating it when absent.
///
/// Idempotent: concurrent callers with the same key end up with the same row
/// because the insert yields to the unique (semester_name, year) constraint.
pub async fn get_or_create(
    pool: &PgPool,
    semester_name: &str,
    year: i32,
) -> Result<ExamSemester, AppError> {
    let name = semester_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Semester name is required".to_string()));
    }
    if year <= 0 {
        return Err(AppError::Validation("Invalid year".to_string()));
    }

    sqlx::query(
        "INSERT INTO exam_semesters (year, semester_name) VALUES ($1, $2) \
         ON CONFLICT (semester_name, year) DO NOTHING",
    )
    .bind(year)
    .bind(name)
    .execute(pool)
    .await?;

    find_by_name_and_year(pool, name, year)
        .await?
        .ok_or(AppError::NotFound)
}

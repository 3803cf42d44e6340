use sqlx::PgPool;

use crate::auth::validate;
use crate::errors::{AppError, is_unique_violation};
use super::types::Course;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        "SELECT course_code, course_title, credits, department FROM courses ORDER BY course_code",
    )
    .fetch_all(pool)
    .await?;
    Ok(courses)
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Course>, AppError> {
    let course = sqlx::query_as::<_, Course>(
        "SELECT course_code, course_title, credits, department FROM courses WHERE course_code = $1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(course)
}

/// Return the subset of `codes` that has no course record.
pub async fn find_missing_codes(pool: &PgPool, codes: &[String]) -> Result<Vec<String>, AppError> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }
    let known: Vec<String> =
        sqlx::query_scalar("SELECT course_code FROM courses WHERE course_code = ANY($1)")
            .bind(codes)
            .fetch_all(pool)
            .await?;
    let mut missing: Vec<String> = codes
        .iter()
        .filter(|c| !known.contains(c))
        .cloned()
        .collect();
    missing.sort();
    missing.dedup();
    Ok(missing)
}

pub async fn create(pool: &PgPool, course: &Course) -> Result<Course, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&course.course_code, "Course code", 32));
    errors.extend(validate::validate_required(&course.course_title, "Course title", 200));
    if course.credits < 0.0 {
        errors.push("Credits cannot be negative".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let result = sqlx::query_as::<_, Course>(
        "INSERT INTO courses (course_code, course_title, credits, department) \
         VALUES ($1, $2, $3, $4) \
         RETURNING course_code, course_title, credits, department",
    )
    .bind(course.course_code.trim())
    .bind(course.course_title.trim())
    .bind(course.credits)
    .bind(course.department.trim())
    .fetch_one(pool)
    .await;

    match result {
        Ok(created) => Ok(created),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Course {} already exists",
            course.course_code.trim()
        ))),
        Err(e) => Err(e.into()),
    }
}

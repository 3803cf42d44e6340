use sqlx::PgPool;

use crate::auth::validate;
use crate::errors::{AppError, is_unique_violation};
use super::types::Teacher;

const SELECT_TEACHER: &str =
    "SELECT id, name, designation, department, mobile_no FROM teachers";

/// All teachers, ordered by name.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Teacher>, AppError> {
    let sql = format!("{SELECT_TEACHER} ORDER BY name, id");
    let teachers = sqlx::query_as::<_, Teacher>(&sql).fetch_all(pool).await?;
    Ok(teachers)
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Teacher>, AppError> {
    let sql = format!("{SELECT_TEACHER} WHERE id = $1");
    let teacher = sqlx::query_as::<_, Teacher>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(teacher)
}

pub async fn exists(pool: &PgPool, id: &str) -> Result<bool, AppError> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Collect validation messages for a teacher record; empty means valid.
pub fn validate_teacher(teacher: &Teacher) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&teacher.id, "Teacher code", 64));
    errors.extend(validate::validate_required(&teacher.name, "Name", 200));
    errors.extend(validate::validate_required(&teacher.designation, "Designation", 100));
    errors.extend(validate::validate_optional(&teacher.department, "Department", 200));
    errors
}

/// Insert a new teacher. A duplicate code is a `Conflict`, not a database error.
pub async fn create(pool: &PgPool, teacher: &Teacher) -> Result<Teacher, AppError> {
    let errors = validate_teacher(teacher);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let result = sqlx::query_as::<_, Teacher>(
        "INSERT INTO teachers (id, name, designation, department, mobile_no) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, designation, department, mobile_no",
    )
    .bind(teacher.id.trim())
    .bind(teacher.name.trim())
    .bind(teacher.designation.trim())
    .bind(teacher.department.trim())
    .bind(&teacher.mobile_no)
    .fetch_one(pool)
    .await;

    match result {
        Ok(created) => {
            log::info!("Created teacher {} ({})", created.id, created.name);
            Ok(created)
        }
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Teacher with ID {} already exists",
            teacher.id.trim()
        ))),
        Err(e) => Err(e.into()),
    }
}

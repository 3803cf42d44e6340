use sqlx::PgPool;

use crate::errors::{AppError, is_unique_violation};
use crate::models::teacher;
use super::types::{NewUser, Role, TeacherLogin, User};

const SELECT_USER: &str =
    "SELECT id, username, password, role, is_super_admin, teacher_id FROM users";

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let sql = format!("{SELECT_USER} WHERE username = $1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, AppError> {
    let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
        "INSERT INTO users (username, password, role, is_super_admin, teacher_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(new.username.trim())
    .bind(&new.password)
    .bind(new.role.as_str())
    .bind(new.is_super_admin)
    .bind(&new.teacher_id)
    .fetch_one(pool)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "User {} already exists",
            new.username.trim()
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Every teacher with the username of its login, ordered by teacher name.
pub async fn list_teacher_logins(pool: &PgPool) -> Result<Vec<TeacherLogin>, AppError> {
    let rows = sqlx::query_as::<_, TeacherLogin>(
        "SELECT t.id AS teacher_id, t.name AS teacher_name, u.username \
         FROM teachers t LEFT JOIN users u ON u.teacher_id = t.id \
         ORDER BY t.name, t.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Create the teacher-role login for `teacher_id`. A teacher holds at most
/// one login; `password_hash` is already hashed.
pub async fn create_teacher_login(
    pool: &PgPool,
    teacher_id: &str,
    username: &str,
    password_hash: &str,
) -> Result<i64, AppError> {
    let teacher_id = teacher_id.trim();
    if !teacher::exists(pool, teacher_id).await? {
        return Err(AppError::Validation(format!("Unknown teacher {teacher_id}")));
    }
    let linked: Option<String> =
        sqlx::query_scalar("SELECT username FROM users WHERE teacher_id = $1")
            .bind(teacher_id)
            .fetch_optional(pool)
            .await?;
    if let Some(existing) = linked {
        return Err(AppError::Conflict(format!(
            "Teacher {teacher_id} already has the login {existing}"
        )));
    }

    let id = create(
        pool,
        &NewUser {
            username: username.trim().to_string(),
            password: password_hash.to_string(),
            role: Role::Teacher,
            is_super_admin: false,
            teacher_id: Some(teacher_id.to_string()),
        },
    )
    .await?;
    log::info!("Created login {} for teacher {teacher_id}", username.trim());
    Ok(id)
}

/// Create the `admin` super-admin account unless any user exists.
pub async fn seed_admin(pool: &PgPool, password_hash: &str) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        log::info!("Users already present ({count}), skipping admin seed");
        return Ok(false);
    }

    create(
        pool,
        &NewUser {
            username: "admin".to_string(),
            password: password_hash.to_string(),
            role: Role::Admin,
            is_super_admin: true,
            teacher_id: None,
        },
    )
    .await?;
    log::info!("Seeded default admin account");
    Ok(true)
}

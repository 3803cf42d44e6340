use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{require_role, require_teacher};
use crate::errors::AppError;
use crate::models::course::{self, Course};
use crate::models::semester::{self, NewSemester};
use crate::models::teacher::{self, Teacher};
use crate::models::user::Role;

#[derive(Deserialize)]
pub struct NameYearQuery {
    pub semester_name: String,
    pub year: i32,
}

/// GET /api/v1/teachers
pub async fn list_teachers(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    Ok(HttpResponse::Ok().json(teacher::find_all(&pool).await?))
}

/// POST /api/v1/teachers
pub async fn create_teacher(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<Teacher>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let created = teacher::create(&pool, &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/courses
pub async fn list_courses(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    Ok(HttpResponse::Ok().json(course::find_all(&pool).await?))
}

/// POST /api/v1/courses
pub async fn create_course(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<Course>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let created = course::create(&pool, &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/semesters
pub async fn list_semesters(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    Ok(HttpResponse::Ok().json(semester::find_all(&pool).await?))
}

/// POST /api/v1/semesters
pub async fn create_semester(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<NewSemester>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let created = semester::create(&pool, &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/semesters/by-name-year?semester_name=&year=
pub async fn semester_by_name_year(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<NameYearQuery>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let found = semester::find_by_name_and_year(&pool, &query.semester_name, query.year)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

/// GET /api/v1/semesters/get-or-create?semester_name=&year=
pub async fn semester_get_or_create(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<NameYearQuery>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let found = semester::get_or_create(&pool, &query.semester_name, query.year).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// GET /api/v1/teacher/profile
pub async fn own_profile(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let (_, teacher_id) = require_teacher(&session)?;
    let found = teacher::find_by_id(&pool, &teacher_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

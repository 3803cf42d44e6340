use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{require_role, require_teacher};
use crate::errors::AppError;
use crate::export::{self, ExportDocument};
use crate::models::user::Role;
use crate::models::{remuneration, semester, teacher};
use super::dashboard::parse_id;

#[derive(Deserialize)]
pub struct IndividualQuery {
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub semester_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CumulativeQuery {
    #[serde(default)]
    pub semester_id: Option<String>,
}

fn download(doc: ExportDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(doc.content_type)
        .insert_header(("Content-Disposition", doc.content_disposition()))
        .body(doc.body)
}

async fn individual_document(
    pool: &PgPool,
    teacher_id: &str,
    semester_id: i64,
) -> Result<ExportDocument, AppError> {
    let teacher = teacher::find_by_id(pool, teacher_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let semester = semester::find_by_id(pool, semester_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let details = remuneration::find_for_teacher(pool, teacher_id, semester_id).await?;
    log::info!("Exporting statement for {teacher_id}, semester {semester_id}");
    export::individual(&teacher, &semester, &details)
}

/// GET /export/individual?teacher_id=&semester_id=
pub async fn individual(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<IndividualQuery>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;

    let teacher_id = query
        .teacher_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let semester_id = parse_id(query.semester_id.as_deref())?;
    let (Some(teacher_id), Some(semester_id)) = (teacher_id, semester_id) else {
        return Err(AppError::Validation(
            "Please select both a teacher and a semester".to_string(),
        ));
    };

    Ok(download(individual_document(&pool, teacher_id, semester_id).await?))
}

/// GET /export/cumulative?semester_id=
pub async fn cumulative(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<CumulativeQuery>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;

    let semester_id = parse_id(query.semester_id.as_deref())?
        .ok_or_else(|| AppError::Validation("Please select a semester".to_string()))?;
    let report = remuneration::cumulative_report(&pool, semester_id).await?;
    log::info!(
        "Exporting cumulative report for semester {semester_id} ({} teacher(s))",
        report.entries.len()
    );
    Ok(download(export::cumulative(&report)?))
}

/// GET /teacher-export?semester_id=: a teacher's own statement.
pub async fn teacher_individual(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<CumulativeQuery>,
) -> Result<HttpResponse, AppError> {
    let (_, teacher_id) = require_teacher(&session)?;
    let semester_id = parse_id(query.semester_id.as_deref())?
        .ok_or_else(|| AppError::Validation("Please select a semester".to_string()))?;
    Ok(download(individual_document(&pool, &teacher_id, semester_id).await?))
}

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::session::{require_role, require_teacher};
use crate::errors::AppError;
use crate::models::remuneration::{self, RemunerationDetails, RemunerationSubmission, rates};
use crate::models::user::Role;

#[derive(Deserialize)]
pub struct SemesterQuery {
    pub semester_id: i64,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub rows: usize,
}

#[derive(Serialize)]
pub struct DetailsResponse {
    pub teacher_id: String,
    pub exam_semester_id: i64,
    #[serde(flatten)]
    pub details: RemunerationDetails,
    pub total: f64,
}

/// POST /api/v1/remuneration/submit
pub async fn submit(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<RemunerationSubmission>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let rows = remuneration::submit(&pool, &body).await?;
    Ok(HttpResponse::Ok().json(SubmitResponse {
        message: "Remuneration data submitted successfully",
        rows,
    }))
}

async fn details_response(
    pool: &PgPool,
    teacher_id: String,
    exam_semester_id: i64,
) -> Result<DetailsResponse, AppError> {
    let details = remuneration::find_for_teacher(pool, &teacher_id, exam_semester_id).await?;
    let total = rates::total(&details);
    Ok(DetailsResponse { teacher_id, exam_semester_id, details, total })
}

/// GET /api/v1/remuneration/teacher/{teacher_id}/semester/{semester_id}
pub async fn for_teacher(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let (teacher_id, semester_id) = path.into_inner();
    Ok(HttpResponse::Ok().json(details_response(&pool, teacher_id, semester_id).await?))
}

/// GET /api/v1/reports/cumulative/{semester_id}
pub async fn cumulative(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let report = remuneration::cumulative_report(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/v1/teacher/remuneration?semester_id=
pub async fn own_remuneration(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<SemesterQuery>,
) -> Result<HttpResponse, AppError> {
    let (_, teacher_id) = require_teacher(&session)?;
    Ok(HttpResponse::Ok().json(details_response(&pool, teacher_id, query.semester_id).await?))
}

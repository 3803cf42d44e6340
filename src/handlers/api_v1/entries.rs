use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::session::require_role;
use crate::errors::AppError;
use crate::form::FormDraft;
use crate::models::user::Role;
use crate::store::EntryStore;

#[derive(Deserialize)]
pub struct EntryRequest {
    #[serde(rename = "initialData", default)]
    pub initial_data: FormDraft,
    pub semester_name: String,
    pub exam_year: i32,
}

/// GET /api/v1/entries
pub async fn list(
    store: web::Data<EntryStore>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    Ok(HttpResponse::Ok().json(store.list()))
}

/// GET /api/v1/entries/{teacher_id}
pub async fn read(
    store: web::Data<EntryStore>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let entry = store.get(&path).ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(entry))
}

/// PUT /api/v1/entries/{teacher_id}: replaces any existing entry.
pub async fn upsert(
    store: web::Data<EntryStore>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<EntryRequest>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let teacher_id = path.into_inner();
    if teacher_id.trim().is_empty() {
        return Err(AppError::Validation("Teacher id is required".to_string()));
    }
    let body = body.into_inner();
    let entry = store.put(&teacher_id, body.initial_data, &body.semester_name, body.exam_year)?;
    Ok(HttpResponse::Ok().json(entry))
}

/// DELETE /api/v1/entries/{teacher_id}
pub async fn delete(
    store: web::Data<EntryStore>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    match store.remove(&path)? {
        Some(_) => Ok(HttpResponse::NoContent().finish()),
        None => Err(AppError::NotFound),
    }
}

/// DELETE /api/v1/entries
pub async fn clear(
    store: web::Data<EntryStore>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    store.clear()?;
    Ok(HttpResponse::NoContent().finish())
}

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{require_role, require_teacher};
use crate::errors::{AppError, render};
use crate::models::remuneration::{self, rates};
use crate::models::user::Role;
use crate::models::{semester, teacher};
use crate::store::EntryStore;
use crate::templates_structs::{
    DashboardTemplate, PageContext, TeacherDashboardTemplate, TeacherSemesterRow,
};

#[derive(Deserialize)]
pub struct SemesterQuery {
    #[serde(default)]
    pub semester_id: Option<String>,
}

/// Parse an optional id from a query string; blank means "not chosen".
pub fn parse_id(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid id '{s}'"))),
    }
}

/// GET /dashboard: cumulative report of the chosen semester (newest by default).
pub async fn index(
    pool: web::Data<PgPool>,
    store: web::Data<EntryStore>,
    session: Session,
    query: web::Query<SemesterQuery>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let ctx = PageContext::build(&session, "/dashboard")?;

    let semesters = semester::find_all(&pool).await?;
    let selected = match parse_id(query.semester_id.as_deref())? {
        Some(id) => Some(id),
        None => semesters.first().map(|s| s.id),
    };

    let report = match selected {
        Some(id) => match remuneration::cumulative_report(&pool, id).await {
            Ok(report) => Some(report),
            Err(AppError::NotFound) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };

    let tmpl = DashboardTemplate {
        ctx,
        semesters,
        selected_semester_id: selected.unwrap_or(0),
        report,
        pending_entries: store.list(),
    };
    render(tmpl)
}

/// GET /teacher-dashboard: the logged-in teacher's claims per semester.
pub async fn teacher_index(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let (_, teacher_id) = require_teacher(&session)?;
    let ctx = PageContext::build(&session, "/teacher-dashboard")?;

    let teacher = teacher::find_by_id(&pool, &teacher_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut rows = Vec::new();
    for semester in remuneration::find_semesters_for_teacher(&pool, &teacher_id).await? {
        let details = remuneration::find_for_teacher(&pool, &teacher_id, semester.id).await?;
        rows.push(TeacherSemesterRow {
            line_count: details.row_count(),
            total: rates::total(&details),
            semester,
        });
    }
    let grand_total = rows.iter().map(|r| r.total).sum();

    render(TeacherDashboardTemplate { ctx, teacher, rows, grand_total })
}

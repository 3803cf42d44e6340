use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{require_role, set_flash};
use crate::auth::{csrf, password, validate};
use crate::errors::{AppError, render};
use crate::models::user::{self, Role};
use crate::templates_structs::{AccountsTemplate, PageContext};

#[derive(Deserialize)]
pub struct TeacherLoginForm {
    pub csrf_token: String,
    pub teacher_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /accounts
pub async fn list(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let ctx = PageContext::build(&session, "/accounts")?;
    let logins = user::list_teacher_logins(&pool).await?;
    render(AccountsTemplate { ctx, logins })
}

/// POST /accounts: create the login a teacher signs in with.
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<TeacherLoginForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let problem = validate::validate_username(&form.username)
        .or_else(|| validate::validate_password(&form.password));
    if let Some(msg) = problem {
        set_flash(&session, msg);
        return Ok(redirect());
    }

    let hash = password::hash_password(&form.password)?;
    match user::create_teacher_login(&pool, &form.teacher_id, &form.username, &hash).await {
        Ok(_) => set_flash(
            &session,
            format!("Login {} created for teacher {}", form.username.trim(), form.teacher_id.trim()),
        ),
        Err(AppError::Conflict(msg)) | Err(AppError::Validation(msg)) => set_flash(&session, msg),
        Err(e) => return Err(e),
    }
    Ok(redirect())
}

fn redirect() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", "/accounts"))
        .finish()
}

use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{self as auth_store, AuthUser};
use crate::auth::{csrf, password, rate_limit::RateLimiter};
use crate::errors::{AppError, render};
use crate::models::user::{self, Role};
use crate::templates_structs::{APP_NAME, LoginTemplate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_page_with(
    session: &Session,
    error: Option<&str>,
    username: &str,
    role: &str,
) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error: error.map(str::to_string),
        app_name: APP_NAME.to_string(),
        csrf_token: csrf::get_or_create_token(session),
        username: username.to_string(),
        role: role.to_string(),
    };
    render(tmpl)
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if let Some(user) = auth_store::get(&session) {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", user.role.home()))
            .finish());
    }
    login_page_with(&session, None, "", Role::Admin.as_str())
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check before any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failed attempts");
        return login_page_with(
            &session,
            Some("Too many failed login attempts. Please try again later."),
            &form.username,
            &form.role,
        );
    }

    let Some(role) = Role::parse(&form.role) else {
        return login_page_with(&session, Some("Please choose a role"), &form.username, &form.role);
    };

    let found = user::find_by_username(&pool, &form.username).await?;
    let verified = match &found {
        Some(u) => password::verify_password(&form.password, &u.password)?,
        None => false,
    };

    let Some(u) = found.filter(|_| verified) else {
        limiter.record_failure(ip);
        log::info!("Failed login for '{}'", form.username.trim());
        return login_page_with(
            &session,
            Some("Invalid username or password"),
            &form.username,
            &form.role,
        );
    };

    if u.role() != role {
        limiter.record_failure(ip);
        return login_page_with(
            &session,
            Some(&format!("This account cannot sign in as {}", role.as_str())),
            &form.username,
            &form.role,
        );
    }
    if role == Role::Teacher && u.teacher_id.as_deref().is_none_or(str::is_empty) {
        return login_page_with(
            &session,
            Some("This teacher account is not linked to a teacher record"),
            &form.username,
            &form.role,
        );
    }

    limiter.clear(ip);
    let auth_user = AuthUser::issue(&u, role);
    auth_store::set(&session, &auth_user)?;
    log::info!("{} logged in as {}", auth_user.username, role.as_str());

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", role.home()))
        .finish())
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    auth_store::clear(&session);
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}

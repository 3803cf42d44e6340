use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    middleware::Next,
};

use crate::auth::session;
use crate::models::user::Role;

fn is_api(path: &str) -> bool {
    path.starts_with("/api/")
}

/// Whether a user with `role` may open `path`.
///
/// Teacher accounts are confined to the teacher pages and the teacher API;
/// admins use everything except the teacher pages.
pub fn allowed_path(role: Role, path: &str) -> bool {
    let teacher_area = path.starts_with("/teacher-") || path.starts_with("/api/v1/teacher/");
    match role {
        Role::Teacher => teacher_area || path == "/logout",
        Role::Admin => !path.starts_with("/teacher-"),
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Checks for a logged-in user and the role's path rules.
///
/// Any 401 coming back from a handler ends the session: the session is purged
/// and page requests are sent to /login.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let path = req.path().to_string();
    let user = session::get(&req.get_session());

    let Some(user) = user else {
        let response = if is_api(&path) {
            HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Not logged in" }))
        } else {
            redirect("/login")
        };
        return Ok(req.into_response(response).map_into_right_body());
    };

    if !allowed_path(user.role, &path) {
        log::warn!("{} ({}) denied access to {path}", user.username, user.role.as_str());
        let response = if is_api(&path) {
            HttpResponse::Forbidden().json(serde_json::json!({ "error": "Permission denied" }))
        } else {
            redirect(user.role.home())
        };
        return Ok(req.into_response(response).map_into_right_body());
    }

    let res = next.call(req).await?;
    if res.status() != StatusCode::UNAUTHORIZED {
        return Ok(res.map_into_left_body());
    }

    log::info!("Session of {} rejected, logging out", user.username);
    session::clear(&res.request().get_session());
    if is_api(&path) {
        return Ok(res.map_into_left_body());
    }
    let (http_req, _) = res.into_parts();
    Ok(ServiceResponse::new(http_req, redirect("/login")).map_into_right_body())
}

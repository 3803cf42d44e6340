pub mod directory;
pub mod entries;
pub mod remuneration;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// CSRF protection for REST API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests without `Content-Type: application/json`.
/// Browsers cannot send cross-origin JSON with cookies from a plain form, so
/// the content type check stands in for a token. GET requests are exempt.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure API v1 routes. Specific paths come before `{id}` patterns.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teachers")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(directory::list_teachers))
            .route("", web::post().to(directory::create_teacher))
    );
    cfg.service(
        web::scope("/courses")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(directory::list_courses))
            .route("", web::post().to(directory::create_course))
    );
    cfg.service(
        web::scope("/semesters")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(directory::list_semesters))
            .route("", web::post().to(directory::create_semester))
            .route("/by-name-year", web::get().to(directory::semester_by_name_year))
            .route("/get-or-create", web::get().to(directory::semester_get_or_create))
    );
    cfg.service(
        web::scope("/remuneration")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/submit", web::post().to(remuneration::submit))
            .route(
                "/teacher/{teacher_id}/semester/{semester_id}",
                web::get().to(remuneration::for_teacher),
            )
    );
    cfg.service(
        web::scope("/reports")
            .route("/cumulative/{semester_id}", web::get().to(remuneration::cumulative))
    );
    cfg.service(
        web::scope("/teacher")
            .route("/profile", web::get().to(directory::own_profile))
            .route("/remuneration", web::get().to(remuneration::own_remuneration))
    );
    cfg.service(
        web::scope("/entries")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(entries::list))
            .route("", web::delete().to(entries::clear))
            .route("/{teacher_id}", web::get().to(entries::read))
            .route("/{teacher_id}", web::put().to(entries::upsert))
            .route("/{teacher_id}", web::delete().to(entries::delete))
    );
}

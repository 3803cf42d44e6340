use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, HttpServer, middleware, web};

use remuneration::auth::{self, rate_limit::RateLimiter};
use remuneration::config::Config;
use remuneration::import::{PeopleDirectory, RosterDirectory};
use remuneration::store::EntryStore;
use remuneration::{db, handlers};

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = Config::from_env().map_err(|e| startup_error("Configuration", e))?;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;
    db::seed(&pool, &config.admin_password)
        .await
        .map_err(|e| startup_error("Failed to seed admin account", e))?;

    let store = EntryStore::open(&config.entry_store_path)
        .map_err(|e| startup_error("Failed to open entry store", e))?;

    let roster = match &config.people_roster_path {
        Some(path) => RosterDirectory::load(path).map_err(|e| startup_error("People roster", e))?,
        None => {
            log::warn!("No PEOPLE_ROSTER_PATH set, teacher search is disabled");
            RosterDirectory::default()
        }
    };
    let directory: web::Data<dyn PeopleDirectory> =
        web::Data::from(Arc::new(roster) as Arc<dyn PeopleDirectory>);

    let limiter = web::Data::new(RateLimiter::new());
    let store = web::Data::new(store);
    let pool = web::Data::new(pool);
    let secret_key = config.session_key.clone();

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(pool.clone())
            .app_data(store.clone())
            .app_data(limiter.clone())
            .app_data(directory.clone())
            .app_data(handlers::form_config())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Public routes
            .route("/login", web::get().to(handlers::auth_handlers::login_page))
            .route("/login", web::post().to(handlers::auth_handlers::login_submit))
            .route("/", web::get().to(|| async {
                HttpResponse::SeeOther()
                    .insert_header(("Location", "/login"))
                    .finish()
            }))
            // JSON API
            .service(
                web::scope("/api/v1")
                    .wrap(middleware::from_fn(auth::middleware::require_auth))
                    .configure(handlers::api_v1::configure)
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(middleware::from_fn(auth::middleware::require_auth))
                    .route("/logout", web::post().to(handlers::auth_handlers::logout))
                    // Admin pages
                    .route("/dashboard", web::get().to(handlers::dashboard::index))
                    .route("/remuneration-form", web::get().to(handlers::form_handlers::admin_form))
                    .route("/remuneration-form", web::post().to(handlers::form_handlers::admin_submit))
                    .route("/import", web::get().to(handlers::import_handlers::people_page))
                    .route("/import/search", web::post().to(handlers::import_handlers::people_search))
                    .route("/import/save", web::post().to(handlers::import_handlers::people_save))
                    .route("/accounts", web::get().to(handlers::account_handlers::list))
                    .route("/accounts", web::post().to(handlers::account_handlers::create))
                    .route("/excel-import", web::get().to(handlers::import_handlers::upload_page))
                    .route("/excel-import", web::post().to(handlers::import_handlers::upload_submit))
                    .route("/excel-import/open", web::post().to(handlers::import_handlers::open_entry))
                    .route("/export/individual", web::get().to(handlers::export_handlers::individual))
                    .route("/export/cumulative", web::get().to(handlers::export_handlers::cumulative))
                    // Teacher pages
                    .route("/teacher-dashboard", web::get().to(handlers::dashboard::teacher_index))
                    .route("/teacher-remuneration-form", web::get().to(handlers::form_handlers::teacher_form))
                    .route("/teacher-remuneration-form", web::post().to(handlers::form_handlers::teacher_submit))
                    .route("/teacher-export", web::get().to(handlers::export_handlers::teacher_individual))
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}

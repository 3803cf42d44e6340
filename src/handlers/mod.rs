use actix_web::web;

pub mod account_handlers;
pub mod api_v1;
pub mod auth_handlers;
pub mod dashboard;
pub mod export_handlers;
pub mod form_handlers;
pub mod import_handlers;

/// Urlencoded body limit. Import documents travel as JSON inside a form field
/// and a full semester of examiners runs well past actix's 16 KiB default.
pub const FORM_LIMIT: usize = 4 * 1024 * 1024;

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().limit(FORM_LIMIT)
}

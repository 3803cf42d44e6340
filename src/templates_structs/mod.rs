// Template context structures for Askama templates, organized by page area.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{self, take_flash};
use crate::errors::AppError;

pub const APP_NAME: &str = "Exam Remuneration Portal";

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.is_admin`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub role_label: String,
    pub is_admin: bool,
    pub is_super_admin: bool,
    pub flash: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, current_path: &str) -> Result<Self, AppError> {
        let user = session::require_user(session)?;
        let flash = take_flash(session);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = user
            .username
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string();
        let role_label = if user.is_super_admin {
            "Super admin".to_string()
        } else if user.is_admin() {
            "Admin".to_string()
        } else {
            "Teacher".to_string()
        };
        Ok(Self {
            is_admin: user.is_admin(),
            is_super_admin: user.is_super_admin,
            username: user.username,
            avatar_initial,
            role_label,
            flash,
            app_name: APP_NAME.to_string(),
            csrf_token,
            current_path: current_path.to_string(),
        })
    }

    /// Navigation links for the logged-in role.
    pub fn nav(&self) -> Vec<NavLink> {
        let links: &[(&'static str, &'static str)] = if self.is_admin {
            &[
                ("/dashboard", "Dashboard"),
                ("/remuneration-form", "Remuneration form"),
                ("/excel-import", "Excel import"),
                ("/import", "Teacher import"),
                ("/accounts", "Teacher logins"),
            ]
        } else {
            &[
                ("/teacher-dashboard", "My claims"),
                ("/teacher-remuneration-form", "Remuneration form"),
            ]
        };
        links
            .iter()
            .map(|&(path, label)| NavLink {
                path,
                label,
                active: self.current_path == path,
            })
            .collect()
    }
}

pub struct NavLink {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

mod accounts;
mod common;
mod dashboard;
mod form;
mod import;

pub use self::accounts::AccountsTemplate;
pub use self::common::LoginTemplate;
pub use self::dashboard::{DashboardTemplate, TeacherDashboardTemplate, TeacherSemesterRow};
pub use self::form::{FormMode, RemunerationFormTemplate};
pub use self::import::{ExcelImportTemplate, ImportTemplate};

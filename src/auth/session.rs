//! The auth store: every read or write of the logged-in user goes through here.

use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::auth::csrf;
use crate::errors::AppError;
use crate::models::user::{Role, User};

const AUTH_KEY: &str = "auth";
const FLASH_KEY: &str = "flash";

/// The logged-in user as kept in the session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
    pub is_super_admin: bool,
    pub teacher_id: Option<String>,
    /// Opaque bearer token issued at login.
    pub token: String,
}

impl AuthUser {
    /// Build the session record for `user` logging in as `role`, with a fresh token.
    pub fn issue(user: &User, role: Role) -> Self {
        AuthUser {
            username: user.username.clone(),
            role,
            is_super_admin: user.is_super_admin,
            teacher_id: user.teacher_id.clone(),
            token: csrf::generate_token(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn set(session: &Session, user: &AuthUser) -> Result<(), AppError> {
    session.renew();
    session
        .insert(AUTH_KEY, user)
        .map_err(|e| AppError::Session(e.to_string()))
}

/// The logged-in user. A missing or unreadable record is "not logged in".
pub fn get(session: &Session) -> Option<AuthUser> {
    match session.get::<AuthUser>(AUTH_KEY) {
        Ok(user) => user,
        Err(e) => {
            log::warn!("Discarding unreadable auth record: {e}");
            session.remove(AUTH_KEY);
            None
        }
    }
}

/// Log out: drops the auth record and everything else in the session.
pub fn clear(session: &Session) {
    session.purge();
}

pub fn require_user(session: &Session) -> Result<AuthUser, AppError> {
    get(session).ok_or(AppError::Unauthorized)
}

pub fn require_role(session: &Session, role: Role) -> Result<AuthUser, AppError> {
    let user = require_user(session)?;
    if user.role != role {
        return Err(AppError::PermissionDenied(format!(
            "{} access required",
            role.as_str()
        )));
    }
    Ok(user)
}

/// The teacher id a teacher account is linked to.
pub fn require_teacher(session: &Session) -> Result<(AuthUser, String), AppError> {
    let user = require_role(session, Role::Teacher)?;
    let teacher_id = user
        .teacher_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::PermissionDenied("account is not linked to a teacher".to_string()))?;
    Ok((user, teacher_id))
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    if let Err(e) = session.insert(FLASH_KEY, message.into()) {
        log::warn!("Could not store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}

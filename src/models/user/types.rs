use serde::{Deserialize, Serialize};

/// Portal role chosen on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }

    /// Where a freshly logged-in user of this role lands.
    pub fn home(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboard",
            Role::Teacher => "/teacher-dashboard",
        }
    }
}

/// Internal user struct for authentication; includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
    pub is_super_admin: bool,
    pub teacher_id: Option<String>,
}

impl User {
    /// Unknown role strings fall back to the least privileged role.
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or(Role::Teacher)
    }
}

/// New user data for creation. `password` is already hashed.
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub is_super_admin: bool,
    pub teacher_id: Option<String>,
}

/// A teacher and the login linked to it, if one has been created.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeacherLogin {
    pub teacher_id: String,
    pub teacher_name: String,
    pub username: Option<String>,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub course_code: String,
    pub course_title: String,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub department: String,
}

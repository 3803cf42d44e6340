use serde::{Deserialize, Serialize};

/// A teacher as stored in the directory. `id` is the university staff code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub department: String,
    #[serde(default)]
    pub mobile_no: Option<String>,
}

/// Form input for saving an imported teacher.
#[derive(Debug, Clone, Deserialize)]
pub struct TeacherForm {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub department: String,
    pub csrf_token: String,
}

impl From<TeacherForm> for Teacher {
    fn from(form: TeacherForm) -> Self {
        Teacher {
            id: form.id,
            name: form.name,
            designation: form.designation,
            department: form.department,
            mobile_no: None,
        }
    }
}

use askama::Template;

use crate::models::user::TeacherLogin;

use super::PageContext;

#[derive(Template)]
#[template(path = "accounts.html")]
pub struct AccountsTemplate {
    pub ctx: PageContext,
    pub logins: Vec<TeacherLogin>,
}

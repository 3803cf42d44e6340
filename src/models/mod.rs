pub mod course;
pub mod remuneration;
pub mod semester;
pub mod teacher;
pub mod user;

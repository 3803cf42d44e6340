//! Shared test infrastructure.
//!
//! Database tests need a Postgres server reachable through `TEST_DATABASE_URL`.
//! They are `#[ignore]`d so the default run stays self-contained; run them with
//! `cargo test -- --ignored`.
//!
//! Every [`TestDb`] lives in its own schema, so tests can run in parallel
//! against one database.

#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use remuneration::auth::csrf;
use remuneration::db;
use remuneration::form::rows::{
    OtherKind, OtherRemuneration, PaperSection, QuestionPreparation, ScriptEvaluation, ScriptType,
    VivaExam,
};
use remuneration::models::course::{self, Course};
use remuneration::models::remuneration::RemunerationDetails;
use remuneration::models::semester::{self, ExamSemester};
use remuneration::models::teacher::{self, Teacher};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "Admin123!";
pub const SEMESTER: &str = "1st Year 1st Semester";
pub const YEAR: i32 = 2024;

// ============================================================================
// DATABASE SETUP
// ============================================================================

pub struct TestDb {
    pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Drop the test schema and everything in it.
    pub async fn teardown(self) {
        self.pool.close().await;
        let sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
        self.admin
            .execute(sql.as_str())
            .await
            .expect("Failed to drop test schema");
    }
}

/// Create a fresh schema, point a pool at it and apply the migrations.
pub async fn setup_test_db() -> TestDb {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for database tests");
    let schema = format!("test_{}", &csrf::generate_token()[..16]);

    let admin = PgPool::connect(&url).await.expect("Failed to connect to test database");
    let create = format!("CREATE SCHEMA {schema}");
    admin.execute(create.as_str()).await.expect("Failed to create test schema");

    let search_path = format!("SET search_path TO {schema}");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .after_connect(move |conn, _meta| {
            let sql = search_path.clone();
            Box::pin(async move {
                conn.execute(sql.as_str()).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("Failed to open test pool");

    db::run_migrations(&pool).await.expect("Failed to run migrations");

    TestDb { pool, admin, schema }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn teacher_fixture(id: &str, name: &str) -> Teacher {
    Teacher {
        id: id.to_string(),
        name: name.to_string(),
        designation: "Lecturer".to_string(),
        department: "CSE".to_string(),
        mobile_no: None,
    }
}

pub fn semester_fixture(id: i64, name: &str, year: i32) -> ExamSemester {
    ExamSemester {
        id,
        year,
        semester_name: name.to_string(),
        exam_start_date: None,
        exam_end_date: None,
        result_publish_date: None,
        chairman_id: None,
    }
}

/// A small claim touching four categories.
pub fn sample_details() -> RemunerationDetails {
    RemunerationDetails {
        question_preparations: vec![QuestionPreparation {
            course_code: "CSE101".to_string(),
            section_type: PaperSection::Full,
        }],
        script_evaluations: vec![ScriptEvaluation {
            course_code: "CSE101".to_string(),
            script_type: ScriptType::Final,
            script_count: 40,
        }],
        viva_exams: vec![VivaExam {
            course_code: "CSE102".to_string(),
            student_count: 30,
        }],
        other_remunerations: vec![OtherRemuneration {
            remuneration_type: OtherKind::Stencil,
            details: "Final exam stencils".to_string(),
            page_count: Some(12),
        }],
        ..RemunerationDetails::default()
    }
}

pub async fn seed_teacher(pool: &PgPool, id: &str, name: &str) -> Teacher {
    teacher::create(pool, &teacher_fixture(id, name))
        .await
        .expect("Failed to seed teacher")
}

pub async fn seed_course(pool: &PgPool, code: &str) -> Course {
    let c = Course {
        course_code: code.to_string(),
        course_title: format!("Course {code}"),
        credits: 3.0,
        department: "CSE".to_string(),
    };
    course::create(pool, &c).await.expect("Failed to seed course")
}

/// Courses referenced by [`sample_details`].
pub async fn seed_sample_courses(pool: &PgPool) {
    seed_course(pool, "CSE101").await;
    seed_course(pool, "CSE102").await;
}

pub async fn seed_semester(pool: &PgPool) -> ExamSemester {
    semester::get_or_create(pool, SEMESTER, YEAR)
        .await
        .expect("Failed to seed semester")
}

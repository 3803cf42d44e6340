use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::errors::AppError;
use crate::models::user;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the schema. Every statement is idempotent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the default admin account on an empty user table.
pub async fn seed(pool: &PgPool, admin_password: &str) -> Result<(), AppError> {
    let hash = password::hash_password(admin_password)?;
    user::seed_admin(pool, &hash).await?;
    Ok(())
}

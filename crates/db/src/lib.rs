//! PostgreSQL persistence for MQT imports, lines, alerts and validation rules.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Tables the MQT service reads and writes.
pub const MQT_TABLES: [&str; 4] = [
    "mqt_imports",
    "mqt_lines",
    "mqt_alerts",
    "mqt_validation_rules",
];

/// Whether every table in [`MQT_TABLES`] exists in the connected database.
pub async fn mqt_tables_present(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let missing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM UNNEST($1::text[]) AS t(name) WHERE to_regclass(t.name) IS NULL",
    )
    .bind(&MQT_TABLES[..])
    .fetch_one(pool)
    .await?;
    Ok(missing == 0)
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

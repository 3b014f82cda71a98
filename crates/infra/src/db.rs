//! Postgres pool and schema migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open a connection pool against `url`.
pub async fn connect(url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
    tracing::debug!("database pool established");
    Ok(pool)
}

/// Run all pending schema migrations to completion.
///
/// The deployed bootstrap calls this before binding the listener, so traffic
/// is only accepted once the schema is current.
pub async fn run_pending_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

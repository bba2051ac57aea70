//! Persistence handle: one SQLite pool built at startup and shared by the
//! catalog and the session store.

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{path::Path, str::FromStr, time::Duration};

/// Only connection establishment is bounded; queries run without a timeout.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const INIT_SQL: &str = include_str!("../migrations/0001_init.sql");

/// Build the pool without touching the database. The first query (or
/// `probe`) opens a connection.
pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    ensure_parent_dir(database_url)?;

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parsing database url `{}`", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    Ok(SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(options))
}

/// Create the parent directory of a file-backed database.
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let db_path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("file:");
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    if db_path.is_empty() || db_path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {:?}", parent))?;
            tracing::info!("Created missing directory {:?}", parent);
        }
    }
    Ok(())
}

/// Cheap liveness query used at startup and by `/readyz`.
pub async fn probe(db: &SqlitePool) -> Result<(), sqlx::Error> {
    let one = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(db).await?;
    if one != 1 {
        return Err(sqlx::Error::Protocol(format!(
            "unexpected probe result: {}",
            one
        )));
    }
    Ok(())
}

/// Apply the embedded schema. Statements are idempotent.
pub async fn run_migrations(db: &SqlitePool) -> Result<()> {
    let statements = INIT_SQL
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    tracing::info!("Running {} migration statements...", statements.len());

    for stmt in statements {
        tracing::debug!("Executing migration SQL: {}", stmt);
        sqlx::query(stmt)
            .execute(db)
            .await
            .with_context(|| format!("executing migration statement `{}`", stmt))?;
    }

    Ok(())
}

/// A migrated in-memory database. A single connection is kept alive for the
/// pool's lifetime since every new `:memory:` connection is a fresh database.
pub async fn memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_are_repeatable() {
        let pool = memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        probe(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn status_outside_enum_is_refused_by_schema() {
        let pool = memory_pool().await.unwrap();
        let res = sqlx::query(
            "INSERT INTO products (id, name, price, images, seller_id, status, created_at, updated_at)
             VALUES ('a', 'n', 1, '[]', 's', 'archived', 't', 't')",
        )
        .execute(&pool)
        .await;
        assert!(res.is_err());
    }

    #[test]
    fn memory_urls_need_no_directory() {
        assert!(ensure_parent_dir("sqlite::memory:").is_ok());
    }
}

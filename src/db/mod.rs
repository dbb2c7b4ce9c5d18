pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{FeedbackEntry, NewFeedbackRequest};

pub use repository::SqliteFeedbackStore;

pub const CREATE_FEEDBACKS: &str = include_str!("../../migrations/0001_create_feedbacks.sql");

/// Persistence seam used by the HTTP handlers.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Inserts one row and returns it as stored.
    async fn insert(&self, req: &NewFeedbackRequest) -> Result<FeedbackEntry, AppError>;
    /// Newest rows first, at most `limit` of them.
    async fn latest(&self, limit: i64) -> Result<Vec<FeedbackEntry>, AppError>;
    async fn ping(&self) -> Result<(), AppError>;
}

pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates the `feedbacks` table if it does not exist yet.
///
/// Runs inside a transaction; a failed statement rolls back and the error is
/// returned to the caller, which decides whether it is fatal.
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    migrate_with(pool, CREATE_FEEDBACKS).await
}

async fn migrate_with(pool: &SqlitePool, script: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    if let Err(e) = sqlx::query(script).execute(&mut *tx).await {
        if let Err(rollback_err) = tx.rollback().await {
            warn!("rollback after failed migration also failed: {}", rollback_err);
        }
        error!("migration failed: {}", e);
        return Err(e.into());
    }

    tx.commit().await.map_err(|e| {
        error!("migration failed on commit: {}", e);
        AppError::from(e)
    })?;

    info!("migration completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db")
    }

    async fn column_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('feedbacks') ORDER BY cid")
            .fetch_all(pool)
            .await
            .expect("Failed to read table info")
    }

    #[tokio::test]
    async fn test_migrate_creates_feedbacks_table() {
        let pool = memory_pool().await;

        migrate(&pool).await.expect("Failed to run migration");

        assert_eq!(
            column_names(&pool).await,
            vec!["id", "name", "email", "message", "course", "howheard", "rating", "created_at"]
        );
    }

    #[tokio::test]
    async fn test_migrate_twice_is_a_noop() {
        let pool = memory_pool().await;

        migrate(&pool).await.expect("first migration failed");
        sqlx::query(
            "INSERT INTO feedbacks (name, email, message, course, rating) VALUES ('a', 'a@b.co', 'm', 'GenAI', 3)",
        )
        .execute(&pool)
        .await
        .expect("Failed to insert row");

        migrate(&pool).await.expect("second migration failed");

        assert_eq!(column_names(&pool).await.len(), 8);
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedbacks")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_migrate_failure_is_reported() {
        let pool = memory_pool().await;
        pool.close().await;

        let result = migrate(&pool).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_failed_statement_rolls_back_whole_script() {
        let pool = memory_pool().await;

        let script = format!("{}\nINSERT INTO missing_table VALUES (1);", CREATE_FEEDBACKS);
        let result = migrate_with(&pool, &script).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'feedbacks'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 0);

        migrate(&pool).await.expect("migration after rollback failed");
        assert_eq!(column_names(&pool).await.len(), 8);
    }

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let path = std::env::temp_dir().join(format!("feedback-connect-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = Config {
            database_url: format!("sqlite://{}", path.display()),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            max_connections: 1,
            strict_validation: false,
        };
        let pool = connect(&config).await.expect("Failed to connect");
        migrate(&pool).await.expect("Failed to migrate");
        pool.close().await;

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}

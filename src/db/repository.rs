use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::FeedbackStore;
use crate::error::AppError;
use crate::models::{FeedbackEntry, NewFeedbackRequest};

pub async fn fetch_latest(db: &SqlitePool, limit: i64) -> Result<Vec<FeedbackEntry>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackEntry>(
        r#"
        SELECT id, name, email, message, course, howheard, rating, created_at
        FROM feedbacks
        ORDER BY id DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn insert_feedback(
    db: &SqlitePool,
    req: &NewFeedbackRequest,
) -> Result<FeedbackEntry, sqlx::Error> {
    sqlx::query_as::<_, FeedbackEntry>(
        r#"
        INSERT INTO feedbacks (name, email, message, course, rating, howheard)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING id, name, email, message, course, howheard, rating, created_at
        "#,
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.message)
    .bind(&req.course)
    .bind(req.rating)
    .bind(&req.how_heard)
    .fetch_one(db)
    .await
}

/// `FeedbackStore` backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteFeedbackStore {
    db: SqlitePool,
}

impl SqliteFeedbackStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn insert(&self, req: &NewFeedbackRequest) -> Result<FeedbackEntry, AppError> {
        Ok(insert_feedback(&self.db, req).await?)
    }

    async fn latest(&self, limit: i64) -> Result<Vec<FeedbackEntry>, AppError> {
        Ok(fetch_latest(&self.db, limit).await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }
}

//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{InsertError, LinkRepository};
use crate::error::AppError;

/// Unique constraint on `links.short_code`.
const SHORT_CODE_CONSTRAINT: &str = "links_short_code_key";

/// Unique constraint on `links.original`.
const ORIGINAL_CONSTRAINT: &str = "links_original_key";

/// PostgreSQL repository for link storage and retrieval.
///
/// Both uniqueness rules live in the schema (see `migrations/`), so concurrent
/// inserts are serialized by the database rather than by the application.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Classifies a failed insert by the violated constraint.
fn classify_insert_error(e: sqlx::Error) -> InsertError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        match db.constraint() {
            Some(SHORT_CODE_CONSTRAINT) => return InsertError::ShortCodeTaken,
            Some(ORIGINAL_CONSTRAINT) => return InsertError::OriginalTaken,
            _ => {}
        }
    }

    InsertError::Store(AppError::from(e))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original, is_file, created_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_original(&self, original: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original, is_file, created_at
            FROM links
            WHERE original = $1
            "#,
        )
        .bind(original)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, InsertError> {
        sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (short_code, original, is_file)
            VALUES ($1, $2, $3)
            RETURNING id, short_code, original, is_file, created_at
            "#,
        )
        .bind(&new_link.short_code)
        .bind(&new_link.original)
        .bind(new_link.is_file)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(classify_insert_error)
    }

    async fn list_file_links_with_originals_in(
        &self,
        names: &[String],
    ) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original, is_file, created_at
            FROM links
            WHERE is_file = TRUE AND original = ANY($1)
            "#,
        )
        .bind(names)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

//! Category repository

use sqlx::{FromRow, PgPool};

use super::DbError;

/// Category record
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories by name.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as("SELECT id, name FROM categories ORDER BY name ASC, id ASC")
            .fetch_all(self.pool)
            .await?;

        Ok(categories)
    }
}

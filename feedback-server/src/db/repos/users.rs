//! User repository
//!
//! Read-only access to public profiles. Password hashes never leave the
//! database layer.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Public user profile
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Author summary embedded in comments and replies.
///
/// Selected with `u.id AS author_id` so it can be flattened next to the
/// owning row's own `id`.
#[derive(Debug, Clone, FromRow)]
pub struct Author {
    #[sqlx(rename = "author_id")]
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a live user's profile.
    pub async fn get(&self, id: i64) -> Result<UserProfile, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, username, first_name, last_name, avatar, created_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))
    }
}


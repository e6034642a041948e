//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool, one repo per request
//! - Filters out soft-deleted rows on every read
//! - Locks parent rows inside a transaction before writing children

pub mod categories;
pub mod comments;
pub mod suggestions;
pub mod users;

pub use categories::{Category, CategoryRepo};
pub use comments::{Comment, CommentRepo, CommentWithReplies, Reply};
pub use suggestions::{
    NewSuggestion, Suggestion, SuggestionChanges, SuggestionRepo, SuggestionTombstone,
};
pub use users::{Author, UserProfile, UserRepo};

use sqlx::PgConnection;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Tables whose rows carry a `deleted_at` tombstone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiveTable {
    Users,
    Suggestions,
    Comments,
}

impl LiveTable {
    fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Suggestions => "suggestions",
            Self::Comments => "comments",
        }
    }

    fn resource(self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Suggestions => "suggestion",
            Self::Comments => "comment",
        }
    }
}

/// Row lock strength taken by [`lock_live_row`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowLock {
    /// Writers of this row (vote, update, delete)
    Update,
    /// Writers of child rows; blocks a concurrent delete of the parent
    Share,
}

impl RowLock {
    fn clause(self) -> &'static str {
        match self {
            Self::Update => "FOR UPDATE",
            Self::Share => "FOR SHARE",
        }
    }
}

/// Lock a row that has not been soft-deleted, or fail with NotFound.
///
/// Must run inside a transaction; the lock is held until commit/rollback.
pub(crate) async fn lock_live_row(
    conn: &mut PgConnection,
    table: LiveTable,
    id: i64,
    lock: RowLock,
) -> Result<(), DbError> {
    // table and lock come from closed enums, never from request input
    let sql = format!(
        "SELECT id FROM {} WHERE id = $1 AND deleted_at IS NULL {}",
        table.name(),
        lock.clause()
    );

    sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| DbError::not_found(table.resource(), id))
}

/// Fail with NotFound unless the category exists.
pub(crate) async fn require_category(conn: &mut PgConnection, id: i64) -> Result<(), DbError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(DbError::not_found("category", id))
    }
}

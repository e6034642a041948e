//! Suggestion repository
//!
//! Handles suggestion CRUD with:
//! - Filtered, paginated listing (newest first)
//! - Vote update under a row lock (no lost updates)
//! - Cascading soft delete of comments and replies (one transaction)

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{FromRow, PgPool};

use super::{lock_live_row, require_category, DbError, LiveTable, RowLock};
use crate::models::{
    Paginated, Pagination, PostContent, SuggestionFilter, SuggestionStatus, SuggestionTitle,
    VoteDirection,
};

/// Columns shared by every suggestion read. Comment count only includes
/// live comments.
const SELECT_SUGGESTION: &str = r#"
    SELECT
        s.id,
        s.title,
        s.content,
        s.votes,
        s.category_id,
        c.name AS category_name,
        s.status,
        s.user_id,
        (
            SELECT COUNT(*) FROM comments cm
            WHERE cm.suggestion_id = s.id AND cm.deleted_at IS NULL
        ) AS comment_count,
        s.created_at,
        s.updated_at
    FROM suggestions s
    LEFT JOIN categories c ON c.id = s.category_id
"#;

/// Suggestion with category name and live comment count
#[derive(Debug, Clone, FromRow)]
pub struct Suggestion {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub votes: i32,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: SuggestionStatus,
    pub user_id: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new suggestion
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub title: SuggestionTitle,
    pub content: PostContent,
    pub category_id: Option<i64>,
    pub user_id: i64,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct SuggestionChanges {
    pub title: Option<SuggestionTitle>,
    pub content: Option<PostContent>,
    pub category_id: Option<i64>,
    pub status: Option<SuggestionStatus>,
}

impl SuggestionChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category_id.is_none()
            && self.status.is_none()
    }
}

/// Result of a cascading soft delete
#[derive(Debug, Clone)]
pub struct SuggestionTombstone {
    pub id: i64,
    pub deleted_at: DateTime<Utc>,
    pub comments_deleted: u64,
    pub replies_deleted: u64,
}

/// Suggestion repository
pub struct SuggestionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SuggestionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List live suggestions matching the filter, newest first.
    ///
    /// The total is counted separately so it stays correct when the offset
    /// runs past the last row.
    pub async fn list(
        &self,
        filter: SuggestionFilter,
        page: Pagination,
    ) -> Result<Paginated<Suggestion>, DbError> {
        let status = filter.status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM suggestions s
            WHERE s.deleted_at IS NULL
              AND ($1::BIGINT IS NULL OR s.category_id = $1)
              AND ($2::TEXT IS NULL OR s.status = $2)
            "#,
        )
        .bind(filter.category_id)
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        let sql = format!(
            r#"{SELECT_SUGGESTION}
            WHERE s.deleted_at IS NULL
              AND ($1::BIGINT IS NULL OR s.category_id = $1)
              AND ($2::TEXT IS NULL OR s.status = $2)
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let items: Vec<Suggestion> = sqlx::query_as(&sql)
            .bind(filter.category_id)
            .bind(status)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(Paginated {
            items,
            total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    /// Get a single live suggestion by ID.
    pub async fn get(&self, id: i64) -> Result<Suggestion, DbError> {
        let sql = format!("{SELECT_SUGGESTION} WHERE s.id = $1 AND s.deleted_at IS NULL");

        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("suggestion", id))
    }

    /// Create a suggestion owned by a live user.
    ///
    /// The owner row is share-locked so a concurrent user delete can't
    /// slip in between the check and the insert.
    pub async fn create(&self, new: NewSuggestion) -> Result<Suggestion, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_live_row(&mut *tx, LiveTable::Users, new.user_id, RowLock::Share).await?;
        if let Some(category_id) = new.category_id {
            require_category(&mut *tx, category_id).await?;
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO suggestions (title, content, category_id, status, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(new.title.as_str())
        .bind(new.content.as_str())
        .bind(new.category_id)
        .bind(SuggestionStatus::default().as_str())
        .bind(new.user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(suggestion_id = id, user_id = new.user_id, "suggestion created");

        self.get(id).await
    }

    /// Apply a partial update to a live suggestion.
    pub async fn update(&self, id: i64, changes: SuggestionChanges) -> Result<Suggestion, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_live_row(&mut *tx, LiveTable::Suggestions, id, RowLock::Update).await?;
        if let Some(category_id) = changes.category_id {
            require_category(&mut *tx, category_id).await?;
        }

        if !changes.is_empty() {
            sqlx::query(
                r#"
                UPDATE suggestions SET
                    title = COALESCE($2, title),
                    content = COALESCE($3, content),
                    category_id = COALESCE($4, category_id),
                    status = COALESCE($5, status),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(changes.title.as_ref().map(SuggestionTitle::as_str))
            .bind(changes.content.as_ref().map(PostContent::as_str))
            .bind(changes.category_id)
            .bind(changes.status.map(|s| s.as_str()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(suggestion_id = id, "suggestion updated");

        self.get(id).await
    }

    /// Change the vote counter by exactly one.
    ///
    /// Locks the row, applies a relative update, commits, then re-reads
    /// outside the transaction. Dropping `tx` on any early return rolls back.
    pub async fn vote(&self, id: i64, direction: VoteDirection) -> Result<Suggestion, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_live_row(&mut *tx, LiveTable::Suggestions, id, RowLock::Update).await?;

        let votes: i32 = sqlx::query_scalar(
            r#"
            UPDATE suggestions
            SET votes = votes + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING votes
            "#,
        )
        .bind(id)
        .bind(direction.delta())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(suggestion_id = id, vote = direction.as_str(), votes, "vote applied");

        self.get(id).await
    }

    /// Soft-delete a suggestion with its comments and their replies.
    ///
    /// Replies first, then comments, then the suggestion, all stamped with
    /// the same timestamp in one transaction.
    pub async fn soft_delete(&self, id: i64) -> Result<SuggestionTombstone, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_live_row(&mut *tx, LiveTable::Suggestions, id, RowLock::Update).await?;

        // Waits out in-flight replies (they share-lock the comment), so the
        // replies UPDATE below sees them; later replies find the tombstone.
        sqlx::query("SELECT id FROM comments WHERE suggestion_id = $1 AND deleted_at IS NULL FOR UPDATE")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        // Postgres keeps microseconds; truncate so the returned stamp matches the rows
        let deleted_at = Utc::now().trunc_subsecs(6);

        let replies_deleted = sqlx::query(
            r#"
            UPDATE replies
            SET deleted_at = $2, updated_at = $2
            WHERE deleted_at IS NULL
              AND comment_id IN (SELECT id FROM comments WHERE suggestion_id = $1)
            "#,
        )
        .bind(id)
        .bind(deleted_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let comments_deleted = sqlx::query(
            r#"
            UPDATE comments
            SET deleted_at = $2, updated_at = $2
            WHERE suggestion_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(deleted_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("UPDATE suggestions SET deleted_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(deleted_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(
            suggestion_id = id,
            comments_deleted,
            replies_deleted,
            "suggestion soft-deleted"
        );

        Ok(SuggestionTombstone {
            id,
            deleted_at,
            comments_deleted,
            replies_deleted,
        })
    }
}

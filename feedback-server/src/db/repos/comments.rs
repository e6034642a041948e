//! Comment and reply repository
//!
//! Comments are listed with their replies nested. Replies for a page of
//! comments are fetched in one `= ANY($1)` query, not one per comment.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{lock_live_row, Author, DbError, LiveTable, RowLock};
use crate::models::{Paginated, Pagination, PostContent};

/// Comment with author summary
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub suggestion_id: i64,
    pub content: String,
    #[sqlx(flatten)]
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reply with author summary
#[derive(Debug, Clone, FromRow)]
pub struct Reply {
    pub id: i64,
    pub comment_id: i64,
    pub content: String,
    #[sqlx(flatten)]
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment with its live replies, oldest first
#[derive(Debug, Clone)]
pub struct CommentWithReplies {
    pub comment: Comment,
    pub replies: Vec<Reply>,
}

/// Comment repository
pub struct CommentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List live comments of a live suggestion, oldest first, with replies.
    pub async fn list_for_suggestion(
        &self,
        suggestion_id: i64,
        page: Pagination,
    ) -> Result<Paginated<CommentWithReplies>, DbError> {
        let suggestion_live: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM suggestions WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(suggestion_id)
        .fetch_one(self.pool)
        .await?;

        if !suggestion_live {
            return Err(DbError::not_found("suggestion", suggestion_id));
        }

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE suggestion_id = $1 AND deleted_at IS NULL",
        )
        .bind(suggestion_id)
        .fetch_one(self.pool)
        .await?;

        let comments: Vec<Comment> = sqlx::query_as(
            r#"
            SELECT
                cm.id,
                cm.suggestion_id,
                cm.content,
                u.id AS author_id,
                u.username,
                u.first_name,
                u.last_name,
                u.avatar,
                cm.created_at,
                cm.updated_at
            FROM comments cm
            JOIN users u ON u.id = cm.user_id
            WHERE cm.suggestion_id = $1 AND cm.deleted_at IS NULL
            ORDER BY cm.created_at ASC, cm.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(suggestion_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let comment_ids: Vec<i64> = comments.iter().map(|c| c.id).collect();
        let mut replies = self.replies_for(&comment_ids).await?;

        let items = comments
            .into_iter()
            .map(|comment| CommentWithReplies {
                replies: replies.remove(&comment.id).unwrap_or_default(),
                comment,
            })
            .collect();

        Ok(Paginated {
            items,
            total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    /// Live replies for the given comments, grouped by comment.
    async fn replies_for(&self, comment_ids: &[i64]) -> Result<HashMap<i64, Vec<Reply>>, DbError> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<Reply> = sqlx::query_as(
            r#"
            SELECT
                r.id,
                r.comment_id,
                r.content,
                u.id AS author_id,
                u.username,
                u.first_name,
                u.last_name,
                u.avatar,
                r.created_at,
                r.updated_at
            FROM replies r
            JOIN users u ON u.id = r.user_id
            WHERE r.comment_id = ANY($1) AND r.deleted_at IS NULL
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(comment_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Reply>> = HashMap::new();
        for reply in rows {
            grouped.entry(reply.comment_id).or_default().push(reply);
        }
        Ok(grouped)
    }

    /// Add a comment to a live suggestion.
    ///
    /// The suggestion is share-locked, so a concurrent cascading delete
    /// either runs first (and this fails with NotFound) or waits for us.
    pub async fn create(
        &self,
        suggestion_id: i64,
        user_id: i64,
        content: PostContent,
    ) -> Result<Comment, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_live_row(&mut *tx, LiveTable::Suggestions, suggestion_id, RowLock::Share).await?;
        lock_live_row(&mut *tx, LiveTable::Users, user_id, RowLock::Share).await?;

        let comment: Comment = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO comments (content, user_id, suggestion_id)
                VALUES ($1, $2, $3)
                RETURNING id, suggestion_id, content, user_id, created_at, updated_at
            )
            SELECT
                i.id,
                i.suggestion_id,
                i.content,
                u.id AS author_id,
                u.username,
                u.first_name,
                u.last_name,
                u.avatar,
                i.created_at,
                i.updated_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(content.as_str())
        .bind(user_id)
        .bind(suggestion_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(comment_id = comment.id, suggestion_id, user_id, "comment created");

        Ok(comment)
    }

    /// Reply to a live comment.
    pub async fn reply(
        &self,
        comment_id: i64,
        user_id: i64,
        content: PostContent,
    ) -> Result<Reply, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_live_row(&mut *tx, LiveTable::Comments, comment_id, RowLock::Share).await?;
        lock_live_row(&mut *tx, LiveTable::Users, user_id, RowLock::Share).await?;

        let reply: Reply = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO replies (content, user_id, comment_id)
                VALUES ($1, $2, $3)
                RETURNING id, comment_id, content, user_id, created_at, updated_at
            )
            SELECT
                i.id,
                i.comment_id,
                i.content,
                u.id AS author_id,
                u.username,
                u.first_name,
                u.last_name,
                u.avatar,
                i.created_at,
                i.updated_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(content.as_str())
        .bind(user_id)
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(reply_id = reply.id, comment_id, user_id, "reply created");

        Ok(reply)
    }
}

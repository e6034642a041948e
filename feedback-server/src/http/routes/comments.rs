//! Comment and reply endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Author, Comment, CommentRepo, CommentWithReplies, Reply};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::response::Envelope;
use crate::http::server::AppState;
use crate::models::{Pagination, PaginationParams, PostContent, ValidationError};

/// Body for new comments and replies
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub user_id: i64,
}

impl CreatePostRequest {
    fn validate(self) -> Result<(i64, PostContent), ValidationError> {
        if self.user_id <= 0 {
            return Err(ValidationError::InvalidFormat {
                field: "user_id",
                reason: "must be a positive integer",
            });
        }
        Ok((self.user_id, PostContent::new(&self.content)?))
    }
}

/// Author summary
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

impl From<Author> for AuthorResponse {
    fn from(a: Author) -> Self {
        Self {
            id: a.id,
            username: a.username,
            first_name: a.first_name,
            last_name: a.last_name,
            avatar: a.avatar,
        }
    }
}

/// Reply response
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub id: i64,
    pub comment_id: i64,
    pub content: String,
    pub user: AuthorResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Reply> for ReplyResponse {
    fn from(r: Reply) -> Self {
        Self {
            id: r.id,
            comment_id: r.comment_id,
            content: r.content,
            user: AuthorResponse::from(r.author),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// Comment response with nested replies
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub suggestion_id: i64,
    pub content: String,
    pub user: AuthorResponse,
    pub replies: Vec<ReplyResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl CommentResponse {
    fn new(c: Comment, replies: Vec<Reply>) -> Self {
        Self {
            id: c.id,
            suggestion_id: c.suggestion_id,
            content: c.content,
            user: AuthorResponse::from(c.author),
            replies: replies.into_iter().map(ReplyResponse::from).collect(),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

impl From<CommentWithReplies> for CommentResponse {
    fn from(c: CommentWithReplies) -> Self {
        Self::new(c.comment, c.replies)
    }
}

/// GET /suggestions/{id}/comments
async fn list_comments(
    State(state): State<Arc<AppState>>,
    ValidId(suggestion_id): ValidId,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> Result<Json<Envelope<Vec<CommentResponse>>>, ApiError> {
    let page = Pagination::try_from(&params)?;
    let result = CommentRepo::new(&state.pool)
        .list_for_suggestion(suggestion_id, page)
        .await?;

    Ok(Json(Envelope::page(result.map(CommentResponse::from))))
}

/// POST /suggestions/{id}/comments
async fn create_comment(
    State(state): State<Arc<AppState>>,
    ValidId(suggestion_id): ValidId,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Envelope<CommentResponse>>), ApiError> {
    let (user_id, content) = req.validate()?;
    let comment = CommentRepo::new(&state.pool)
        .create(suggestion_id, user_id, content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(CommentResponse::new(comment, Vec::new()))),
    ))
}

/// POST /comments/{id}/replies
async fn create_reply(
    State(state): State<Arc<AppState>>,
    ValidId(comment_id): ValidId,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Envelope<ReplyResponse>>), ApiError> {
    let (user_id, content) = req.validate()?;
    let reply = CommentRepo::new(&state.pool)
        .reply(comment_id, user_id, content)
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(ReplyResponse::from(reply)))))
}

/// Comment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/suggestions/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/comments/{id}/replies", post(create_reply))
}

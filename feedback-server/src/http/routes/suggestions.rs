//! Suggestion endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{
    NewSuggestion, Suggestion, SuggestionChanges, SuggestionRepo, SuggestionTombstone,
};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::response::Envelope;
use crate::http::server::AppState;
use crate::models::{
    ListSuggestionsParams, PostContent, SuggestionStatus, SuggestionTitle, ValidationError,
    VoteDirection,
};

/// Create suggestion request
#[derive(Deserialize)]
pub struct CreateSuggestionRequest {
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub user_id: i64,
}

impl CreateSuggestionRequest {
    fn validate(self) -> Result<NewSuggestion, ValidationError> {
        Ok(NewSuggestion {
            title: SuggestionTitle::new(&self.title)?,
            content: PostContent::new(&self.content)?,
            category_id: self.category_id.map(|id| positive("category_id", id)).transpose()?,
            user_id: positive("user_id", self.user_id)?,
        })
    }
}

/// Partial update request; absent fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateSuggestionRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<String>,
}

impl UpdateSuggestionRequest {
    fn validate(self) -> Result<SuggestionChanges, ValidationError> {
        Ok(SuggestionChanges {
            title: self.title.as_deref().map(SuggestionTitle::new).transpose()?,
            content: self.content.as_deref().map(PostContent::new).transpose()?,
            category_id: self.category_id.map(|id| positive("category_id", id)).transpose()?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<SuggestionStatus>)
                .transpose()?,
        })
    }
}

/// `?vote=up|down`
#[derive(Deserialize, Default)]
pub struct VoteParams {
    pub vote: Option<String>,
}

fn positive(field: &'static str, id: i64) -> Result<i64, ValidationError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a positive integer",
        })
    }
}

/// Suggestion response
#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub votes: i32,
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub status: SuggestionStatus,
    pub user_id: i64,
    pub comment_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(s: Suggestion) -> Self {
        Self {
            id: s.id,
            title: s.title,
            content: s.content,
            votes: s.votes,
            category_id: s.category_id,
            category: s.category_name,
            status: s.status,
            user_id: s.user_id,
            comment_count: s.comment_count,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// Cascading delete summary
#[derive(Debug, Serialize)]
pub struct DeletedSuggestionResponse {
    pub id: i64,
    pub deleted_at: String,
    pub comments_deleted: u64,
    pub replies_deleted: u64,
}

impl From<SuggestionTombstone> for DeletedSuggestionResponse {
    fn from(t: SuggestionTombstone) -> Self {
        Self {
            id: t.id,
            deleted_at: t.deleted_at.to_rfc3339(),
            comments_deleted: t.comments_deleted,
            replies_deleted: t.replies_deleted,
        }
    }
}

/// GET /suggestions?offset&limit&category&status
async fn list_suggestions(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ListSuggestionsParams>,
) -> Result<Json<Envelope<Vec<SuggestionResponse>>>, ApiError> {
    let (filter, page) = params.validate()?;
    let result = SuggestionRepo::new(&state.pool).list(filter, page).await?;

    Ok(Json(Envelope::page(result.map(SuggestionResponse::from))))
}

/// POST /suggestions
async fn create_suggestion(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateSuggestionRequest>,
) -> Result<(StatusCode, Json<Envelope<SuggestionResponse>>), ApiError> {
    let new = req.validate()?;
    let suggestion = SuggestionRepo::new(&state.pool).create(new).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(SuggestionResponse::from(suggestion))),
    ))
}

/// GET /suggestions/{id}
async fn get_suggestion(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<SuggestionResponse>>, ApiError> {
    let suggestion = SuggestionRepo::new(&state.pool).get(id).await?;
    Ok(Json(Envelope::new(SuggestionResponse::from(suggestion))))
}

/// PATCH /suggestions/{id}
async fn update_suggestion(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<UpdateSuggestionRequest>,
) -> Result<Json<Envelope<SuggestionResponse>>, ApiError> {
    let changes = req.validate()?;
    let suggestion = SuggestionRepo::new(&state.pool).update(id, changes).await?;

    Ok(Json(
        Envelope::new(SuggestionResponse::from(suggestion))
            .with_message("Suggestion updated successfully"),
    ))
}

/// DELETE /suggestions/{id} - soft-deletes the suggestion, its comments and replies
async fn delete_suggestion(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<DeletedSuggestionResponse>>, ApiError> {
    let tombstone = SuggestionRepo::new(&state.pool).soft_delete(id).await?;

    Ok(Json(
        Envelope::new(DeletedSuggestionResponse::from(tombstone))
            .with_message("Suggestion deleted successfully"),
    ))
}

/// PUT /suggestions/{id}/vote?vote=up|down
async fn vote_suggestion(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidQuery(params): ValidQuery<VoteParams>,
) -> Result<Json<Envelope<SuggestionResponse>>, ApiError> {
    let direction = VoteDirection::parse(params.vote.as_deref())?;
    let suggestion = SuggestionRepo::new(&state.pool).vote(id, direction).await?;

    Ok(Json(Envelope::new(SuggestionResponse::from(suggestion))))
}

/// Suggestion routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/suggestions", get(list_suggestions).post(create_suggestion))
        .route(
            "/suggestions/{id}",
            get(get_suggestion)
                .patch(update_suggestion)
                .delete(delete_suggestion),
        )
        .route("/suggestions/{id}/vote", put(vote_suggestion))
}

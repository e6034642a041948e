//! User profile endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::repos::{UserProfile, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::response::Envelope;
use crate::http::server::AppState;

/// Public profile (no password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: String,
}

impl From<UserProfile> for UserResponse {
    fn from(u: UserProfile) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            avatar: u.avatar,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// GET /users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    Ok(Json(Envelope::new(UserResponse::from(user))))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users/{id}", get(get_user))
}

//! Category endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::repos::{Category, CategoryRepo};
use crate::http::error::ApiError;
use crate::http::response::Envelope;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// GET /categories
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<CategoryResponse>>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list().await?;
    let count = categories.len() as i64;

    let mut envelope = Envelope::new(
        categories
            .into_iter()
            .map(CategoryResponse::from)
            .collect::<Vec<_>>(),
    );
    envelope.count = Some(count);

    Ok(Json(envelope))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/categories", get(list_categories))
}

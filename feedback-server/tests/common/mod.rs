//! Shared fixtures for database-backed tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p feedback-server -- --ignored

#![allow(dead_code)]

use sqlx::PgPool;
use uuid::Uuid;

use feedback_server::db::migrations;
use feedback_server::db::repos::{NewSuggestion, Suggestion, SuggestionRepo};
use feedback_server::models::{PostContent, SuggestionTitle};
use feedback_server::create_pool;

/// Connect to DATABASE_URL and make sure the schema exists.
pub async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");
    pool
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Insert a user with a unique username and email.
pub async fn user(pool: &PgPool) -> i64 {
    let username = unique("user");
    sqlx::query_scalar(
        "INSERT INTO users (username, first_name, last_name, email, password_hash) \
         VALUES ($1, 'Test', 'User', $2, 'x') RETURNING id",
    )
    .bind(&username)
    .bind(format!("{}@example.test", username))
    .fetch_one(pool)
    .await
    .expect("insert user")
}

/// Insert a category with a unique name, so list tests can filter down to
/// rows they created.
pub async fn category(pool: &PgPool) -> i64 {
    sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(unique("cat"))
        .fetch_one(pool)
        .await
        .expect("insert category")
}

pub async fn suggestion(pool: &PgPool, user_id: i64, category_id: Option<i64>) -> Suggestion {
    SuggestionRepo::new(pool)
        .create(NewSuggestion {
            title: SuggestionTitle::new("Dark mode").unwrap(),
            content: PostContent::new("Please add a dark theme").unwrap(),
            category_id,
            user_id,
        })
        .await
        .expect("create suggestion")
}

pub fn content(text: &str) -> PostContent {
    PostContent::new(text).unwrap()
}

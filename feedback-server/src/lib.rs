//! feedback-server: REST backend for a product feedback board
//!
//! Clients create suggestions, vote on them, comment, and reply.
//! Storage is PostgreSQL via sqlx; the HTTP layer is axum.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, DbError};
pub use http::{build_router, run_server, ServerConfig, ServerError};

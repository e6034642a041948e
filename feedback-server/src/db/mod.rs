//! Database layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - Connection pool, no Arc<Mutex<Connection>>
//! - Soft-deleted rows (`deleted_at IS NOT NULL`) are invisible to every read
//! - Row locks (`FOR UPDATE` / `FOR SHARE`) instead of check-then-write
//! - Transactions for multi-step operations

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
pub use sqlx::PgPool;

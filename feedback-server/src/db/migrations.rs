//! Schema migrations
//!
//! Every statement is idempotent, so running on each startup is safe.

use sqlx::PgPool;

use super::DbError;

const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            first_name VARCHAR(255) NOT NULL DEFAULT '',
            last_name VARCHAR(255) NOT NULL DEFAULT '',
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            avatar VARCHAR(255),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "categories",
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(50) NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "suggestions",
        r#"
        CREATE TABLE IF NOT EXISTS suggestions (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            votes INTEGER NOT NULL DEFAULT 0,
            category_id BIGINT REFERENCES categories(id) ON DELETE SET NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'suggestion'
                CHECK (status IN ('suggestion', 'planned', 'in-progress', 'live')),
            user_id BIGINT NOT NULL REFERENCES users(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "comments",
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id BIGSERIAL PRIMARY KEY,
            content TEXT NOT NULL,
            user_id BIGINT NOT NULL REFERENCES users(id),
            suggestion_id BIGINT NOT NULL REFERENCES suggestions(id) ON UPDATE CASCADE ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "replies",
        r#"
        CREATE TABLE IF NOT EXISTS replies (
            id BIGSERIAL PRIMARY KEY,
            content TEXT NOT NULL,
            user_id BIGINT NOT NULL REFERENCES users(id),
            comment_id BIGINT NOT NULL REFERENCES comments(id) ON UPDATE CASCADE ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_suggestions_live_created \
     ON suggestions (created_at DESC, id DESC) WHERE deleted_at IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_suggestions_category ON suggestions (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_suggestions_status ON suggestions (status)",
    "CREATE INDEX IF NOT EXISTS idx_suggestions_user ON suggestions (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_suggestion ON comments (suggestion_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_user ON comments (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_replies_comment ON replies (comment_id)",
    "CREATE INDEX IF NOT EXISTS idx_replies_user ON replies (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_users_deleted_at ON users (deleted_at)",
];

/// Advisory lock key held while migrating, so concurrent starters queue up.
const MIGRATION_LOCK_KEY: i64 = 0x6665_6564_6261_636b;

/// Run all migrations in a single transaction.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    // Tables are listed parent-first so foreign keys resolve
    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(&mut *tx).await?;
        tracing::debug!(table, "table ready");
    }

    for ddl in INDEXES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    tracing::info!(tables = TABLES.len(), indexes = INDEXES.len(), "Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_parent_first() {
        let order: Vec<&str> = TABLES.iter().map(|(name, _)| *name).collect();
        let pos = |name: &str| order.iter().position(|t| *t == name).unwrap();

        assert!(pos("users") < pos("suggestions"));
        assert!(pos("categories") < pos("suggestions"));
        assert!(pos("suggestions") < pos("comments"));
        assert!(pos("comments") < pos("replies"));
    }

    #[test]
    fn every_soft_deletable_table_has_tombstone() {
        for (name, ddl) in TABLES {
            if *name != "categories" {
                assert!(ddl.contains("deleted_at TIMESTAMPTZ"), "{name} lacks deleted_at");
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}

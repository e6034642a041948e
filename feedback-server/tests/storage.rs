//! Repository tests against a real PostgreSQL database

mod common;

use feedback_server::db::repos::{CommentRepo, SuggestionChanges, SuggestionRepo, UserRepo};
use feedback_server::models::{Pagination, SuggestionFilter, SuggestionStatus, VoteDirection};
use feedback_server::DbError;

fn is_not_found(err: &DbError) -> bool {
    matches!(err, DbError::NotFound { .. })
}

// === Votes ===

#[tokio::test]
#[ignore = "requires database"]
async fn up_then_down_restores_count() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let created = common::suggestion(&pool, user, None).await;
    let repo = SuggestionRepo::new(&pool);

    for _ in 0..3 {
        repo.vote(created.id, VoteDirection::Up).await.unwrap();
    }
    let after_up = repo.get(created.id).await.unwrap();
    assert_eq!(after_up.votes, created.votes + 3);

    for _ in 0..3 {
        repo.vote(created.id, VoteDirection::Down).await.unwrap();
    }
    let after_down = repo.get(created.id).await.unwrap();
    assert_eq!(after_down.votes, created.votes);
}

#[tokio::test]
#[ignore = "requires database"]
async fn votes_can_go_negative() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let created = common::suggestion(&pool, user, None).await;

    let voted = SuggestionRepo::new(&pool)
        .vote(created.id, VoteDirection::Down)
        .await
        .unwrap();
    assert_eq!(voted.votes, -1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn concurrent_votes_are_not_lost() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let created = common::suggestion(&pool, user, None).await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let pool = pool.clone();
            let id = created.id;
            tokio::spawn(async move {
                SuggestionRepo::new(&pool)
                    .vote(id, VoteDirection::Up)
                    .await
                    .expect("concurrent vote failed")
            })
        })
        .collect();

    for handle in futures::future::join_all(handles).await {
        handle.expect("task panicked");
    }

    let after = SuggestionRepo::new(&pool).get(created.id).await.unwrap();
    assert_eq!(after.votes, 20);
}

#[tokio::test]
#[ignore = "requires database"]
async fn vote_on_missing_suggestion_is_not_found() {
    let pool = common::pool().await;
    let err = SuggestionRepo::new(&pool)
        .vote(i64::MAX, VoteDirection::Up)
        .await
        .unwrap_err();
    assert!(is_not_found(&err));
}

// === Listing ===

#[tokio::test]
#[ignore = "requires database"]
async fn list_pages_newest_first() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let category = common::category(&pool).await;

    let mut ids = Vec::new();
    for _ in 0..12 {
        ids.push(common::suggestion(&pool, user, Some(category)).await.id);
    }
    ids.reverse();

    let filter = SuggestionFilter {
        category_id: Some(category),
        status: None,
    };
    let repo = SuggestionRepo::new(&pool);

    let first = repo.list(filter, Pagination::new(0, 10)).await.unwrap();
    assert_eq!(first.total, 12);
    assert_eq!(first.items.len(), 10);
    assert!(first.has_more());
    let first_ids: Vec<i64> = first.items.iter().map(|s| s.id).collect();
    assert_eq!(first_ids, ids[..10]);

    let second = repo.list(filter, Pagination::new(10, 10)).await.unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_more());

    let past_end = repo.list(filter, Pagination::new(50, 10)).await.unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 12);
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_filters_by_status() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let category = common::category(&pool).await;
    let repo = SuggestionRepo::new(&pool);

    let planned = common::suggestion(&pool, user, Some(category)).await;
    common::suggestion(&pool, user, Some(category)).await;

    repo.update(
        planned.id,
        SuggestionChanges {
            status: Some(SuggestionStatus::Planned),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let filter = SuggestionFilter {
        category_id: Some(category),
        status: Some(SuggestionStatus::Planned),
    };
    let page = repo.list(filter, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, planned.id);
    assert_eq!(page.items[0].status, SuggestionStatus::Planned);
}

// === Create / update ===

#[tokio::test]
#[ignore = "requires database"]
async fn create_joins_category_name() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let category = common::category(&pool).await;

    let created = common::suggestion(&pool, user, Some(category)).await;
    assert_eq!(created.category_id, Some(category));
    assert!(created.category_name.is_some());
    assert_eq!(created.votes, 0);
    assert_eq!(created.comment_count, 0);
    assert_eq!(created.status, SuggestionStatus::Suggestion);
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_rejects_unknown_user() {
    let pool = common::pool().await;
    let err = SuggestionRepo::new(&pool)
        .create(feedback_server::db::repos::NewSuggestion {
            title: feedback_server::models::SuggestionTitle::new("Orphan").unwrap(),
            content: common::content("No author"),
            category_id: None,
            user_id: i64::MAX,
        })
        .await
        .unwrap_err();
    assert!(is_not_found(&err));
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_leaves_absent_fields() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let created = common::suggestion(&pool, user, None).await;

    let updated = SuggestionRepo::new(&pool)
        .update(
            created.id,
            SuggestionChanges {
                content: Some(common::content("Dark theme for the editor too")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, created.title);
    assert_eq!(updated.content, "Dark theme for the editor too");
    assert!(updated.updated_at >= created.updated_at);
}

// === Comments and cascade delete ===

#[tokio::test]
#[ignore = "requires database"]
async fn comments_list_with_replies() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let created = common::suggestion(&pool, user, None).await;
    let comments = CommentRepo::new(&pool);

    let first = comments
        .create(created.id, user, common::content("first"))
        .await
        .unwrap();
    comments
        .create(created.id, user, common::content("second"))
        .await
        .unwrap();
    comments
        .reply(first.id, user, common::content("reply"))
        .await
        .unwrap();

    let page = comments
        .list_for_suggestion(created.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].comment.id, first.id);
    assert_eq!(page.items[0].replies.len(), 1);
    assert!(page.items[1].replies.is_empty());

    let refreshed = SuggestionRepo::new(&pool).get(created.id).await.unwrap();
    assert_eq!(refreshed.comment_count, 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_cascades_to_comments_and_replies() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let category = common::category(&pool).await;
    let created = common::suggestion(&pool, user, Some(category)).await;
    let comments = CommentRepo::new(&pool);
    let suggestions = SuggestionRepo::new(&pool);
    let filter = SuggestionFilter {
        category_id: Some(category),
        status: None,
    };

    let comment = comments
        .create(created.id, user, common::content("doomed"))
        .await
        .unwrap();
    comments
        .reply(comment.id, user, common::content("also doomed"))
        .await
        .unwrap();

    let tombstone = suggestions.soft_delete(created.id).await.unwrap();
    assert_eq!(tombstone.id, created.id);
    assert_eq!(tombstone.comments_deleted, 1);
    assert_eq!(tombstone.replies_deleted, 1);

    assert!(is_not_found(&suggestions.get(created.id).await.unwrap_err()));
    let listed = suggestions.list(filter, Pagination::default()).await.unwrap();
    assert_eq!(listed.total, 0);
    assert!(listed.items.iter().all(|s| s.id != created.id));
    assert!(is_not_found(
        &comments
            .list_for_suggestion(created.id, Pagination::default())
            .await
            .unwrap_err()
    ));
    assert!(is_not_found(
        &comments
            .reply(comment.id, user, common::content("too late"))
            .await
            .unwrap_err()
    ));

    // Rows survive with a shared tombstone
    let stamps: Vec<Option<chrono::DateTime<chrono::Utc>>> = sqlx::query_scalar(
        "SELECT deleted_at FROM suggestions WHERE id = $1 \
         UNION ALL SELECT deleted_at FROM comments WHERE suggestion_id = $1 \
         UNION ALL SELECT r.deleted_at FROM replies r \
             JOIN comments c ON c.id = r.comment_id WHERE c.suggestion_id = $1",
    )
    .bind(created.id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(stamps.len(), 3);
    assert!(stamps.iter().all(|s| *s == Some(tombstone.deleted_at)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_waits_for_in_flight_reply() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let created = common::suggestion(&pool, user, None).await;
    let comment = CommentRepo::new(&pool)
        .create(created.id, user, common::content("parent"))
        .await
        .unwrap();

    // Same locks and insert as CommentRepo::reply, held open across the delete
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM comments WHERE id = $1 AND deleted_at IS NULL FOR SHARE")
        .bind(comment.id)
        .fetch_one(&mut *tx)
        .await
        .unwrap();
    sqlx::query("SELECT id FROM users WHERE id = $1 AND deleted_at IS NULL FOR SHARE")
        .bind(user)
        .fetch_one(&mut *tx)
        .await
        .unwrap();
    let reply_id: i64 = sqlx::query_scalar(
        "INSERT INTO replies (content, user_id, comment_id) VALUES ('racing', $1, $2) RETURNING id",
    )
    .bind(user)
    .bind(comment.id)
    .fetch_one(&mut *tx)
    .await
    .unwrap();

    let delete = tokio::spawn({
        let pool = pool.clone();
        async move { SuggestionRepo::new(&pool).soft_delete(created.id).await }
    });

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert!(!delete.is_finished(), "delete must wait for the open reply");
    tx.commit().await.unwrap();

    let tombstone = delete.await.expect("task panicked").unwrap();
    assert_eq!(tombstone.comments_deleted, 1);
    assert_eq!(tombstone.replies_deleted, 1);

    let reply_deleted_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT deleted_at FROM replies WHERE id = $1")
            .bind(reply_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(reply_deleted_at, Some(tombstone.deleted_at));
}

#[tokio::test]
#[ignore = "requires database"]
async fn second_delete_is_not_found() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let created = common::suggestion(&pool, user, None).await;
    let repo = SuggestionRepo::new(&pool);

    repo.soft_delete(created.id).await.unwrap();
    assert!(is_not_found(&repo.soft_delete(created.id).await.unwrap_err()));
}

// === Users ===

#[tokio::test]
#[ignore = "requires database"]
async fn user_profile_lookup() {
    let pool = common::pool().await;
    let user = common::user(&pool).await;
    let repo = UserRepo::new(&pool);

    let profile = repo.get(user).await.unwrap();
    assert_eq!(profile.id, user);
    assert!(profile.username.starts_with("user-"));
    assert!(is_not_found(&repo.get(i64::MAX).await.unwrap_err()));
}

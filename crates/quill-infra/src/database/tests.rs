use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};

use quill_core::domain::{NewComment, NewPost, NewUser, Post, PostChanges};
use quill_core::error::{Reference, RepoError};
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

use super::connections::{DatabaseConfig, DatabaseHandle};
use super::entity::post;
use super::schema::sync_schema;
use super::sql_repo::{SqlCommentRepository, SqlPostRepository, SqlUserRepository};

fn post_row(id: i64, title: &str, deleted: bool) -> post::Model {
    let now: chrono::DateTime<FixedOffset> = Utc::now().into();
    post::Model {
        id,
        user_id: 3,
        title: title.to_owned(),
        content: "Content".to_owned(),
        comment_count: 2,
        created_at: now,
        updated_at: now,
        deleted_at: deleted.then_some(now),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_row(5, "Test Post", false)]])
        .into_connection();

    let repo = SqlPostRepository::new(Arc::new(db));

    let result: Option<Post> = repo.find_by_id(5).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.id, 5);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.comment_count, 2);
    assert!(post.deleted_at.is_none());
}

#[tokio::test]
async fn test_find_post_by_id_filters_soft_deleted_rows() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection(),
    );

    let repo = SqlPostRepository::new(Arc::clone(&db));

    let result: Option<Post> = repo.find_by_id(5).await.unwrap();
    assert!(result.is_none());

    drop(repo);
    let log = Arc::into_inner(db).unwrap().into_transaction_log();
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("deleted_at") && sql.contains("IS NULL"), "{sql}");
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = SqlPostRepository::new(Arc::new(db));

    let result = repo
        .update(
            9,
            PostChanges {
                title: Some("new".to_string()),
                content: None,
            },
        )
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_soft_delete_stamps_deleted_at() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![
            vec![post_row(5, "Doomed", false)],
            vec![post_row(5, "Doomed", true)],
        ])
        .into_connection();

    let repo = SqlPostRepository::new(Arc::new(db));

    let post = repo.soft_delete(5).await.unwrap();
    assert!(post.deleted_at.is_some());
}

#[tokio::test]
async fn test_comment_on_missing_post_rolls_back() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = SqlCommentRepository::new(Arc::new(db));

    let result = repo
        .create(NewComment {
            user_id: 1,
            post_id: 77,
            content: "hello".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepoError::MissingReference(Reference::Post))
    ));
}

#[tokio::test]
async fn test_query_failure_maps_to_query_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
            "relation does not exist".to_string(),
        ))])
        .into_connection();

    let repo = SqlUserRepository::new(Arc::new(db));

    let result = repo.find_by_username("alice").await;
    assert!(matches!(result, Err(RepoError::Query(_))));
}

// Real SQLite: schema, constraints and the comment-count transaction.

async fn sqlite() -> DatabaseHandle {
    DatabaseHandle::init(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // Each pooled connection to `sqlite::memory:` opens its own database.
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .unwrap()
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$stub".to_string(),
    }
}

async fn seed_post(db: &DatabaseHandle) -> Post {
    let author = SqlUserRepository::new(Arc::clone(&db.conn))
        .create(new_user("author"))
        .await
        .unwrap();

    SqlPostRepository::new(Arc::clone(&db.conn))
        .create(NewPost {
            user_id: author.id,
            title: "Title".to_string(),
            content: "Content".to_string(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_sqlite_schema_sync_is_idempotent() {
    let db = sqlite().await;

    sync_schema(db.conn.as_ref()).await.unwrap();
    db.ping().await.unwrap();
}

#[tokio::test]
async fn test_sqlite_duplicate_username_or_email_is_constraint() {
    let db = sqlite().await;
    let users = SqlUserRepository::new(Arc::clone(&db.conn));

    let first = users.create(new_user("alice")).await.unwrap();
    assert!(first.id > 0);

    let same_name = users
        .create(NewUser {
            email: "other@example.com".to_string(),
            ..new_user("alice")
        })
        .await;
    assert!(matches!(same_name, Err(RepoError::Constraint(_))));

    let same_email = users
        .create(NewUser {
            username: "alice2".to_string(),
            ..new_user("alice")
        })
        .await;
    assert!(matches!(same_email, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn test_sqlite_post_with_unknown_owner_is_missing_user() {
    let db = sqlite().await;
    let posts = SqlPostRepository::new(Arc::clone(&db.conn));

    let result = posts
        .create(NewPost {
            user_id: 404,
            title: "Title".to_string(),
            content: "Content".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepoError::MissingReference(Reference::User))
    ));
}

#[tokio::test]
async fn test_sqlite_comment_bumps_post_count() {
    let db = sqlite().await;
    let post = seed_post(&db).await;
    let comments = SqlCommentRepository::new(Arc::clone(&db.conn));
    let posts = SqlPostRepository::new(Arc::clone(&db.conn));

    let comment = comments
        .create(NewComment {
            user_id: post.user_id,
            post_id: post.id,
            content: "first".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(comment.post_id, post.id);

    let reloaded: Option<Post> = posts.find_by_id(post.id).await.unwrap();
    assert_eq!(reloaded.unwrap().comment_count, 1);
    assert_eq!(comments.list_by_post(post.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sqlite_comment_by_unknown_author_rolls_back_count() {
    let db = sqlite().await;
    let post = seed_post(&db).await;
    let comments = SqlCommentRepository::new(Arc::clone(&db.conn));
    let posts = SqlPostRepository::new(Arc::clone(&db.conn));

    let result = comments
        .create(NewComment {
            user_id: 999,
            post_id: post.id,
            content: "ghost".to_string(),
        })
        .await;
    assert!(matches!(
        result,
        Err(RepoError::MissingReference(Reference::User))
    ));

    let reloaded: Option<Post> = posts.find_by_id(post.id).await.unwrap();
    assert_eq!(reloaded.unwrap().comment_count, 0);
}

#[tokio::test]
async fn test_sqlite_soft_delete_hides_post_and_cannot_repeat() {
    let db = sqlite().await;
    let post = seed_post(&db).await;
    let posts = SqlPostRepository::new(Arc::clone(&db.conn));
    let comments = SqlCommentRepository::new(Arc::clone(&db.conn));

    let deleted = posts.soft_delete(post.id).await.unwrap();
    assert!(deleted.deleted_at.is_some());

    let again = posts.soft_delete(post.id).await;
    assert!(matches!(again, Err(RepoError::NotFound)));

    let found: Option<Post> = posts.find_by_id(post.id).await.unwrap();
    assert!(found.is_none());
    let listed: Vec<Post> = posts.list().await.unwrap();
    assert!(listed.is_empty());

    let comment = comments
        .create(NewComment {
            user_id: post.user_id,
            post_id: post.id,
            content: "too late".to_string(),
        })
        .await;
    assert!(matches!(
        comment,
        Err(RepoError::MissingReference(Reference::Post))
    ));
}

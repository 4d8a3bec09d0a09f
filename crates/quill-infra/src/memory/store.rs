use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{Comment, NewComment, NewPost, NewUser, Post, PostChanges, User};
use quill_core::error::{Reference, RepoError};
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_user_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
}

/// Shared backing store handed out to the per-record repositories.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryCommentRepository {
    tables: Arc<RwLock<Tables>>,
}

fn live<T: Clone>(rows: &BTreeMap<i64, T>, deleted: impl Fn(&T) -> bool) -> Vec<T> {
    rows.values().filter(|row| !deleted(row)).cloned().collect()
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(&id)
            .filter(|u| u.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(live(&tables.users, |u| u.deleted_at.is_some()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        // Mirrors the unique indexes of the SQL schema.
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("users.username".to_string()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users.email".to_string()));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let stored = User {
            id: tables.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username && u.deleted_at.is_none())
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .get(&id)
            .filter(|p| p.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(live(&tables.posts, |p| p.deleted_at.is_some()))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&post.user_id) {
            return Err(RepoError::MissingReference(Reference::User));
        }

        tables.last_post_id += 1;
        let now = Utc::now();
        let stored = Post {
            id: tables.last_post_id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            comment_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .filter(|p| p.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .filter(|p| p.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;

        let now = Utc::now();
        post.deleted_at = Some(now);
        post.updated_at = now;
        Ok(post.clone())
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .get(&id)
            .filter(|c| c.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(live(&tables.comments, |c| c.deleted_at.is_some()))
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&comment.user_id) {
            return Err(RepoError::MissingReference(Reference::User));
        }
        let post = tables
            .posts
            .get_mut(&comment.post_id)
            .filter(|p| p.deleted_at.is_none())
            .ok_or(RepoError::MissingReference(Reference::Post))?;
        post.comment_count += 1;

        tables.last_comment_id += 1;
        let now = Utc::now();
        let stored = Comment {
            id: tables.last_comment_id,
            user_id: comment.user_id,
            post_id: comment.post_id,
            content: comment.content,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.comments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.deleted_at.is_none())
            .cloned()
            .collect())
    }
}

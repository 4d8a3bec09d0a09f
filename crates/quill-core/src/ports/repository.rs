use async_trait::async_trait;

use crate::domain::{Comment, NewComment, NewPost, NewUser, Post, PostChanges, User};
use crate::error::RepoError;

/// Read operations shared by every record store.
///
/// Soft-deleted rows are never returned.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find a live entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// All live entities, ordered by ID.
    async fn list(&self) -> Result<Vec<T>, RepoError>;
}

#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Insert a user. Duplicate username or email is `RepoError::Constraint`.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Insert a post. An unknown owner is `MissingReference(Reference::User)`.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError>;

    /// Stamp `deleted_at` and return the final state of the row.
    async fn soft_delete(&self, id: i64) -> Result<Post, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Insert a comment and bump the post's comment count atomically.
    /// A missing or deleted post is `MissingReference(Reference::Post)`, an
    /// unknown author `MissingReference(Reference::User)`.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;
}

use std::sync::Arc;

use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use crate::memory::MemoryStore;

/// The three record stores the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    /// Repositories over a fresh in-memory store. Data is lost on restart.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
        }
    }

    /// Repositories over an open SeaORM connection.
    #[cfg(feature = "sql")]
    pub fn sql(conn: &Arc<sea_orm::DbConn>) -> Self {
        use crate::database::{SqlCommentRepository, SqlPostRepository, SqlUserRepository};

        Self {
            users: Arc::new(SqlUserRepository::new(Arc::clone(conn))),
            posts: Arc::new(SqlPostRepository::new(Arc::clone(conn))),
            comments: Arc::new(SqlCommentRepository::new(Arc::clone(conn))),
        }
    }
}

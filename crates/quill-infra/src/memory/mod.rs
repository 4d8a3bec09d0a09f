//! In-memory repositories - used when `db.type` is `memory` and in tests.
//!
//! All three stores share one lock so that a comment insert and the post's
//! comment-count bump are applied together, like a transaction would.

mod store;

pub use store::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository, MemoryStore,
};

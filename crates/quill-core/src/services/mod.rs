//! Services - the blog's use cases, written against the ports.
//!
//! Every successful mutation emits one event on the `audit` tracing target.

mod auth;
mod comments;
mod posts;
mod validate;

pub use auth::{AuthService, LoginOutcome, Registration, bearer_token};
pub use comments::CommentService;
pub use posts::PostService;

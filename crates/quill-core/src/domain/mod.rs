//! Domain records - the blog's core business objects.

mod comment;
mod post;
mod user;

pub use comment::{Comment, NewComment};
pub use post::{NewPost, Post, PostChanges};
pub use user::{NewUser, User};

//! SQL persistence via SeaORM.

#[cfg(feature = "sql")]
mod connections;
#[cfg(feature = "sql")]
pub mod entity;
#[cfg(feature = "sql")]
mod errors;
#[cfg(feature = "sql")]
mod schema;
#[cfg(feature = "sql")]
mod sql_base;
#[cfg(feature = "sql")]
mod sql_repo;

#[cfg(feature = "sql")]
pub use connections::{DatabaseConfig, DatabaseHandle};
#[cfg(feature = "sql")]
pub use schema::sync_schema;
#[cfg(feature = "sql")]
pub use sql_base::{SoftDeletable, SqlRepository};
#[cfg(feature = "sql")]
pub use sql_repo::{SqlCommentRepository, SqlPostRepository, SqlUserRepository};

#[cfg(feature = "sql")]
#[cfg(test)]
mod tests;

//! # Quill Core
//!
//! The domain layer of the Quill blog service.
//! Records, ports and the services that enforce the blog's rules live here;
//! persistence and transport are plugged in through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, Reference, RepoError};

//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PasswordService, TokenService};
use quill_core::services::{AuthService, CommentService, PostService};
use quill_infra::database::{DatabaseConfig, DatabaseHandle};
use quill_infra::{Argon2PasswordService, JwtConfig, JwtTokenService, Repositories};

use crate::config::AppConfig;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
    /// `None` when running on the in-memory store.
    pub database: Option<DatabaseHandle>,
}

impl AppState {
    /// Connect to the configured store and wire the services on top of it.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let state = match config.db.url()? {
            Some(url) => {
                let handle = DatabaseHandle::init(&DatabaseConfig {
                    url,
                    max_connections: config.db.max_connections,
                    min_connections: config.db.min_connections,
                })
                .await?;
                let repos = Repositories::sql(&handle.conn);
                Self::with_repositories(config, repos, Some(handle))
            }
            None => {
                tracing::warn!("db.type is memory. Data will not survive a restart.");
                Self::with_repositories(config, Repositories::in_memory(), None)
            }
        };

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Build the state over already-constructed repositories.
    pub fn with_repositories(
        config: AppConfig,
        repos: Repositories,
        database: Option<DatabaseHandle>,
    ) -> Self {
        let tokens: Arc<dyn TokenService> =
            Arc::new(JwtTokenService::new(JwtConfig::from(&config.jwt)));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            config: Arc::new(config),
            auth: AuthService::new(repos.users, passwords, tokens),
            posts: PostService::new(repos.posts),
            comments: CommentService::new(repos.comments),
            database,
        }
    }
}

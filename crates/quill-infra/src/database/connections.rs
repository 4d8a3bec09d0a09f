use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

use super::schema::sync_schema;

/// Connection settings for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Open connection pool with the blog schema in place.
///
/// The pool sits behind an `Arc`: `DbConn` is not `Clone` once SeaORM's
/// `mock` feature is enabled.
#[derive(Clone)]
pub struct DatabaseHandle {
    pub conn: Arc<DbConn>,
}

impl DatabaseHandle {
    /// Connect, then create any missing tables.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            backend = ?conn.get_database_backend(),
            pool = config.max_connections,
            "Database connected"
        );

        sync_schema(&conn).await?;

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }
}

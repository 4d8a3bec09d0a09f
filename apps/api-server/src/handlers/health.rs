//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `sql` or `memory`.
    pub storage: &'static str,
    /// Ping result; absent on the in-memory store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    pub timestamp: String,
}

/// Reports the storage backend and, for SQL, whether the pool still answers.
/// An unreachable database turns the response into a 503.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (storage, database) = match &state.database {
        Some(handle) => match handle.ping().await {
            Ok(()) => ("sql", Some("healthy")),
            Err(err) => {
                tracing::warn!(error = %err, "database ping failed");
                ("sql", Some("unhealthy"))
            }
        },
        None => ("memory", None),
    };
    let healthy = database != Some("unhealthy");

    let response = HealthResponse {
        status: if healthy { "ok" } else { "error" },
        version: env!("CARGO_PKG_VERSION"),
        storage,
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Service banner and health check
///
/// # Endpoints
///
/// - `GET /`: Welcome message
/// - `GET /health`: Liveness plus store connectivity
///
/// # Health Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": "postgres",
///   "timestamp": "2025-01-01T00:00:00Z"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub documentation: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the store is unreachable
    pub status: String,

    /// Application version
    pub version: String,

    /// Active store backend
    pub storage: String,

    /// Server time
    pub timestamp: DateTime<Utc>,
}

/// Welcome message
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the Tasklist API".to_string(),
        documentation: env!("CARGO_PKG_REPOSITORY").to_string(),
    })
}

/// Health check handler
///
/// Always answers 200 so load balancers can tell a live process from a dead
/// one; store trouble shows up as `"status": "degraded"`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.store.users.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.store.backend().to_string(),
        timestamp: Utc::now(),
    })
}

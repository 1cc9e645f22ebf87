//! Health Routes
//!
//! - GET /health/live - Liveness check (process is alive)
//! - GET /health/ready - Readiness check (database answers)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// 503 with the error envelope while the database does not answer.
pub async fn readiness(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.store.ping().map_err(|e| {
        tracing::warn!("Database health check failed: {}", e);
        ApiError::ServiceUnavailable(format!("database: {}", e))
    })?;
    Ok(StatusCode::OK)
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database_ok = check_database(&state);

    Json(HealthResponse {
        status: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        database: if database_ok { "ok" } else { "error" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn check_database(state: &AppState) -> bool {
    match state.store.ping() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::store::Store;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_liveness() {
        assert_eq!(liveness().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_with_open_database() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let state = Arc::new(AppState::new(store, ApiConfig::default()));

        assert_eq!(readiness(State(state)).await.unwrap(), StatusCode::OK);
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let response = ApiError::ServiceUnavailable("database: locked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_full_health_reports_database() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let state = Arc::new(AppState::new(store, ApiConfig::default()));

        let Json(health) = full_health(State(state)).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.database, "ok");
    }
}

//! Ticket Server REST API
//!
//! HTTP API for tickets and users, built with Axum.
//!
//! # Endpoints
//!
//! ## Tickets
//! - `GET /api/tickets` - List tickets (filters: systemSource, category,
//!   status, priority, search; pagination: page, pageSize)
//! - `POST /api/tickets` - Create a ticket
//! - `GET /api/tickets/stats` - Dashboard statistics
//! - `GET /api/tickets/:id` - Get a ticket
//! - `PUT /api/tickets/:id` - Update a ticket
//! - `DELETE /api/tickets/:id` - Delete a ticket
//! - `POST /api/tickets/:id/close` - Close a ticket
//!
//! ## Users
//! - `GET /api/users` - List users
//! - `POST /api/users` - Create a user
//! - `GET /api/users/:id` - Get a user
//! - `PUT /api/users/:id` - Update a user
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use aftersales::api::{serve, ApiConfig, AppState};
//! use aftersales::store::Store;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Store::open("./data/tickets.db")?);
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(store, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let ticket_routes = Router::new()
        .route(
            "/",
            get(routes::tickets::list_tickets).post(routes::tickets::create_ticket),
        )
        .route("/stats", get(routes::tickets::ticket_stats))
        .route(
            "/:id",
            get(routes::tickets::get_ticket)
                .put(routes::tickets::update_ticket)
                .delete(routes::tickets::delete_ticket),
        )
        .route("/:id/close", post(routes::tickets::close_ticket));

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .post(routes::users::update_user),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/tickets", ticket_routes)
        .nest("/api/users", user_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Ticket API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Ticket API shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ticket, TicketListResponse, TicketStatistics, User};
    use crate::store::Store;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = Arc::new(Store::open_in_memory().unwrap());
        build_router(AppState::new(store, ApiConfig::default()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const NEW_TICKET: &str = r#"{
        "systemSource": "TMS",
        "category": "SYSTEM_FAILURE",
        "description": "Waybill sync stuck",
        "handleType": "DEV",
        "priority": "P1",
        "tags": ["sync"],
        "createdBy": "alice"
    }"#;

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_test_app();
        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = send(&app, "GET", uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let app = create_test_app();

        let response = send(&app, "POST", "/api/tickets", Some(NEW_TICKET)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Ticket = json(response).await;
        assert_eq!(created.status.as_str(), "OPEN");

        let response = send(&app, "GET", &format!("/api/tickets/{}", created.id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Ticket = json(response).await;
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.tags, vec!["sync".to_string()]);
    }

    #[tokio::test]
    async fn test_list_with_query() {
        let app = create_test_app();
        for _ in 0..3 {
            send(&app, "POST", "/api/tickets", Some(NEW_TICKET)).await;
        }

        let response = send(
            &app,
            "GET",
            "/api/tickets?page=2&pageSize=2&status=OPEN&search=WAYBILL",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let page: TicketListResponse = json(response).await;
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_validation_error() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/tickets?pageSize=500", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_update_close_delete() {
        let app = create_test_app();
        let created: Ticket = json(send(&app, "POST", "/api/tickets", Some(NEW_TICKET)).await).await;
        let uri = format!("/api/tickets/{}", created.id);

        let response = send(&app, "PUT", &uri, Some(r#"{"status":"PROCESSING"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Ticket = json(response).await;
        assert_eq!(updated.status.as_str(), "PROCESSING");

        let response = send(&app, "POST", &format!("{}/close", uri), None).await;
        let closed: Ticket = json(response).await;
        assert_eq!(closed.status.as_str(), "COMPLETED");
        assert!(closed.closed_at.is_some());

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = json(response).await;
        assert_eq!(body["id"], created.id.as_str());

        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let app = create_test_app();
        let cases = [
            ("GET", "/api/tickets/nope", None),
            ("PUT", "/api/tickets/nope", Some("{}")),
            ("DELETE", "/api/tickets/nope", None),
            ("POST", "/api/tickets/nope/close", None),
            ("GET", "/api/users/nope", None),
        ];
        for (method, uri, body) in cases {
            let response = send(&app, method, uri, body).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_stats() {
        let app = create_test_app();
        send(&app, "POST", "/api/tickets", Some(NEW_TICKET)).await;

        let response = send(&app, "GET", "/api/tickets/stats", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let stats: TicketStatistics = json(response).await;
        assert_eq!(stats.overview.total, 1);
        assert_eq!(stats.overview.open, 1);
        assert_eq!(stats.trend.len(), 30);
        assert_eq!(stats.trend[29].date, "Today");
        assert_eq!(stats.trend[29].value, 1);
    }

    #[tokio::test]
    async fn test_users() {
        let app = create_test_app();
        let body = r#"{"name":"Han Meimei","email":"han@example.com","role":"PRODUCT"}"#;

        let response = send(&app, "POST", "/api/users", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let user: User = json(response).await;

        let response = send(&app, "POST", "/api/users", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/api/users/{}", user.id);
        let response = send(&app, "PUT", &uri, Some(r#"{"role":"ADMIN"}"#)).await;
        let updated: User = json(response).await;
        assert_eq!(updated.role.as_str(), "ADMIN");

        let response = send(&app, "POST", &uri, Some(r#"{"name":"Han M."}"#)).await;
        let renamed: User = json(response).await;
        assert_eq!(renamed.name, "Han M.");

        let users: Vec<User> = json(send(&app, "GET", "/api/users", None).await).await;
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let app = create_test_app();
        let response = send(&app, "POST", "/api/tickets", Some("not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_missing_field_uses_error_envelope() {
        let app = create_test_app();
        let body = r#"{
            "systemSource": "TMS",
            "category": "SYSTEM_FAILURE",
            "handleType": "DEV",
            "priority": "P1"
        }"#;

        let response = send(&app, "POST", "/api/tickets", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("description"));
    }

    #[tokio::test]
    async fn test_unknown_filter_value_uses_error_envelope() {
        let app = create_test_app();

        let response = send(&app, "GET", "/api/tickets?status=BOGUS", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("BOGUS"));
    }

    #[tokio::test]
    async fn test_bad_user_body_uses_error_envelope() {
        let app = create_test_app();
        let body = r#"{"name": "Ada", "email": "ada@example.com", "role": "JANITOR"}"#;

        let response = send(&app, "POST", "/api/users", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_cors_layer_accepts_origin_list() {
        // Invalid header values are skipped, not fatal
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
        let _ = cors_layer(&[]);
    }
}

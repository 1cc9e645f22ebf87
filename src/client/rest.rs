//! Typed REST client

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::error::ClientError;
use crate::models::{
    MessageResponse, Ticket, TicketCreate, TicketListParams, TicketListResponse,
    TicketStatistics, TicketUpdate, User, UserCreate, UserUpdate,
};

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Server root, e.g. "http://localhost:8000"
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// One method per endpoint of the ticket server. Every call is a single
/// request: no retries, no caching.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else if e.is_connect() {
                ClientError::Unavailable(self.base_url.clone())
            } else {
                ClientError::Request(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", body);
            Err(ClientError::from_body(status.as_u16(), &body))
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.fetch(self.request(Method::GET, path)).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(method, path).json(body)).await
    }

    fn ticket_path(id: &str) -> String {
        format!("/api/tickets/{}", urlencoding::encode(id))
    }

    fn user_path(id: &str) -> String {
        format!("/api/users/{}", urlencoding::encode(id))
    }

    // Tickets

    /// `GET /api/tickets`
    pub async fn list_tickets(
        &self,
        params: &TicketListParams,
    ) -> Result<TicketListResponse, ClientError> {
        let path = format!("/api/tickets?{}", params.to_query_string());
        self.get(&path).await
    }

    /// `POST /api/tickets`
    pub async fn create_ticket(&self, ticket: &TicketCreate) -> Result<Ticket, ClientError> {
        self.send_json(Method::POST, "/api/tickets", ticket).await
    }

    /// `GET /api/tickets/{id}`
    pub async fn get_ticket(&self, id: &str) -> Result<Ticket, ClientError> {
        self.get(&Self::ticket_path(id)).await
    }

    /// `PUT /api/tickets/{id}`
    pub async fn update_ticket(
        &self,
        id: &str,
        update: &TicketUpdate,
    ) -> Result<Ticket, ClientError> {
        self.send_json(Method::PUT, &Self::ticket_path(id), update)
            .await
    }

    /// `DELETE /api/tickets/{id}`
    pub async fn delete_ticket(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.fetch(self.request(Method::DELETE, &Self::ticket_path(id)))
            .await
    }

    /// `POST /api/tickets/{id}/close`
    pub async fn close_ticket(&self, id: &str) -> Result<Ticket, ClientError> {
        let path = format!("{}/close", Self::ticket_path(id));
        self.fetch(self.request(Method::POST, &path)).await
    }

    /// `GET /api/tickets/stats`
    pub async fn ticket_stats(&self) -> Result<TicketStatistics, ClientError> {
        self.get("/api/tickets/stats").await
    }

    // Users

    /// `GET /api/users`
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/api/users").await
    }

    /// `POST /api/users`
    pub async fn create_user(&self, user: &UserCreate) -> Result<User, ClientError> {
        user.validate()?;
        self.send_json(Method::POST, "/api/users", user).await
    }

    /// `GET /api/users/{id}`
    pub async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        self.get(&Self::user_path(id)).await
    }

    /// `PUT /api/users/{id}`
    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, ClientError> {
        update.validate()?;
        self.send_json(Method::PUT, &Self::user_path(id), update)
            .await
    }

    /// `GET /health/live`
    pub async fn health_check(&self) -> Result<(), ClientError> {
        self.send(self.request(Method::GET, "/health/live"))
            .await
            .map(|_| ())
    }
}


#[cfg(all(test, feature = "server"))]
mod live_tests {
    use super::*;
    use crate::api::{build_router, ApiConfig, AppState};
    use crate::models::{
        HandleType, SystemSource, TicketCategory, TicketPriority, TicketStatus, UserRole,
    };
    use crate::store::Store;
    use std::sync::Arc;

    async fn spawn_server() -> ApiClient {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let state = AppState::new(store, ApiConfig::default());
        let router = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(ApiClientConfig {
            base_url: format!("http://{}", addr),
            timeout_ms: 5_000,
        })
        .unwrap()
    }

    fn new_ticket(description: &str) -> TicketCreate {
        TicketCreate {
            system_source: SystemSource::Wms,
            category: TicketCategory::SystemFailure,
            description: description.to_string(),
            handle_type: HandleType::Dev,
            handle_detail: String::new(),
            priority: TicketPriority::P1,
            tags: vec!["inventory".to_string()],
            solution_template: None,
            assigned_to: None,
            created_by: Some("alice".to_string()),
        }
    }

    #[tokio::test]
    async fn test_ticket_lifecycle() {
        let client = spawn_server().await;
        client.health_check().await.unwrap();

        let created = client
            .create_ticket(&new_ticket("Stock count mismatch"))
            .await
            .unwrap();
        assert_eq!(created.status, TicketStatus::Open);

        let fetched = client.get_ticket(&created.id).await.unwrap();
        assert_eq!(fetched.description, "Stock count mismatch");

        let started = client
            .update_ticket(&created.id, &TicketUpdate::status(TicketStatus::Processing))
            .await
            .unwrap();
        assert_eq!(started.status, TicketStatus::Processing);

        let closed = client.close_ticket(&created.id).await.unwrap();
        assert_eq!(closed.status, TicketStatus::Completed);
        assert!(closed.closed_at.is_some());

        let stats = client.ticket_stats().await.unwrap();
        assert_eq!(stats.overview.total, 1);
        assert_eq!(stats.overview.completed, 1);

        let deleted = client.delete_ticket(&created.id).await.unwrap();
        assert_eq!(deleted.id.as_deref(), Some(created.id.as_str()));

        let err = client.get_ticket(&created.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let client = spawn_server().await;
        for description in ["Label printer offline", "Slow picking wave", "Printer jam"] {
            client.create_ticket(&new_ticket(description)).await.unwrap();
        }

        let params = TicketListParams {
            search: Some("printer".to_string()),
            page_size: 1,
            ..Default::default()
        };
        let page = client.list_tickets(&params).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_users() {
        let client = spawn_server().await;
        let user = UserCreate {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            role: UserRole::Developer,
        };

        let created = client.create_user(&user).await.unwrap();
        let duplicate = client.create_user(&user).await.unwrap_err();
        assert_eq!(duplicate.status(), Some(400));

        let updated = client
            .update_user(
                &created.id,
                &UserUpdate {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Admin);
        assert_eq!(client.get_user(&created.id).await.unwrap().name, "Bob");
        assert_eq!(client.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = ApiClient::new(ApiClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 2_000,
        })
        .unwrap();
        let err = client.ticket_stats().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Unavailable(_) | ClientError::Timeout | ClientError::Request(_)
        ));
    }
}

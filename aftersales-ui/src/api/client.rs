//! HTTP API Client
//!
//! Functions for communicating with the ticket server REST API. Failures
//! come back as a display string; pages turn them into notices.

use aftersales::models::{
    MessageResponse, Ticket, TicketCreate, TicketListParams, TicketListResponse,
    TicketStatistics, TicketUpdate,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const API_URL_KEY: &str = "aftersales_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Error body written by the server
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorDetail {
    message: String,
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let status = response.status();
        let status_text = response.status_text();
        let message = response
            .json::<ErrorEnvelope>()
            .await
            .map(|body| body.error.message)
            .unwrap_or(status_text);
        return Err(format!("{} ({})", message, status));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = Request::get(&format!("{}{}", get_api_base(), path))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

fn ticket_path(id: &str) -> String {
    format!("/api/tickets/{}", urlencoding::encode(id))
}

// ============ Tickets ============

/// `GET /api/tickets`
pub async fn list_tickets(params: &TicketListParams) -> Result<TicketListResponse, String> {
    get(&format!("/api/tickets?{}", params.to_query_string())).await
}

/// `GET /api/tickets/{id}`
pub async fn get_ticket(id: &str) -> Result<Ticket, String> {
    get(&ticket_path(id)).await
}

/// `POST /api/tickets`
pub async fn create_ticket(ticket: &TicketCreate) -> Result<Ticket, String> {
    let response = Request::post(&format!("{}/api/tickets", get_api_base()))
        .json(ticket)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

/// `PUT /api/tickets/{id}`
pub async fn update_ticket(id: &str, update: &TicketUpdate) -> Result<Ticket, String> {
    let response = Request::put(&format!("{}{}", get_api_base(), ticket_path(id)))
        .json(update)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

/// `POST /api/tickets/{id}/close`
pub async fn close_ticket(id: &str) -> Result<Ticket, String> {
    let response = Request::post(&format!("{}{}/close", get_api_base(), ticket_path(id)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

/// `DELETE /api/tickets/{id}`
pub async fn delete_ticket(id: &str) -> Result<MessageResponse, String> {
    let response = Request::delete(&format!("{}{}", get_api_base(), ticket_path(id)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read(response).await
}

/// `GET /api/tickets/stats`
pub async fn ticket_stats() -> Result<TicketStatistics, String> {
    get("/api/tickets/stats").await
}

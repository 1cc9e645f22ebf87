//! Ticket Routes
//!
//! - GET /api/tickets - Filtered, paginated list
//! - POST /api/tickets - Create a ticket
//! - GET /api/tickets/stats - Dashboard statistics
//! - GET /api/tickets/:id - Get a ticket
//! - PUT /api/tickets/:id - Partial update
//! - DELETE /api/tickets/:id - Delete a ticket
//! - POST /api/tickets/:id/close - Mark completed

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::state::AppState;
use crate::models::{
    MessageResponse, Ticket, TicketCreate, TicketListParams, TicketListResponse,
    TicketStatistics, TicketUpdate,
};

/// GET /api/tickets
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<TicketListParams>,
) -> ApiResult<Json<TicketListResponse>> {
    let page = state.store.list_tickets(&params)?;
    tracing::debug!(total = page.total, page = page.page, "Listed tickets");
    Ok(Json(page))
}

/// POST /api/tickets
///
/// New tickets start OPEN.
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TicketCreate>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    let ticket = state.store.create_ticket(&req)?;

    tracing::info!(
        ticket_id = %ticket.id,
        category = %ticket.category,
        priority = %ticket.priority,
        "Created ticket"
    );

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/tickets/stats
pub async fn ticket_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TicketStatistics>> {
    Ok(Json(state.store.ticket_statistics(Utc::now())?))
}

/// GET /api/tickets/:id
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ticket>> {
    Ok(Json(state.store.get_ticket(&id)?))
}

/// PUT /api/tickets/:id
pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TicketUpdate>,
) -> ApiResult<Json<Ticket>> {
    let ticket = state.store.update_ticket(&id, &req)?;
    tracing::info!(ticket_id = %id, status = %ticket.status, "Updated ticket");
    Ok(Json(ticket))
}

/// POST /api/tickets/:id/close
pub async fn close_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ticket>> {
    let ticket = state.store.close_ticket(&id)?;
    tracing::info!(ticket_id = %id, "Closed ticket");
    Ok(Json(ticket))
}

/// DELETE /api/tickets/:id
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_ticket(&id)?;
    tracing::info!(ticket_id = %id, "Deleted ticket");

    Ok(Json(MessageResponse {
        message: "Ticket deleted successfully".to_string(),
        id: Some(id),
    }))
}

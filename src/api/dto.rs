//! Data Transfer Objects
//!
//! Response types owned by the server itself. Ticket and user payloads are
//! the shared models in [`crate::models`].

use serde::{Deserialize, Serialize};

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// "ok" or "error"
    pub database: String,
    pub uptime_seconds: u64,
    pub version: String,
}

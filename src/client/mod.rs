//! Native API Client
//!
//! reqwest wrappers for the ticket server's REST endpoints, used by the
//! `aftersales` CLI. Non-2xx answers become [`ClientError::Api`] carrying
//! the status and the server's message.

pub mod error;
pub mod rest;

pub use error::ClientError;
pub use rest::{ApiClient, ApiClientConfig};

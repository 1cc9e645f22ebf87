//! HTTP API
//!
//! Browser-side calls to the ticket server.

pub mod client;

pub use client::*;

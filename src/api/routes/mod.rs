//! API Routes
//!
//! Route handlers organized by resource.

pub mod health;
pub mod tickets;
pub mod users;

//! # Aftersales Desk
//!
//! After-sales ticket management: a platform-neutral client core, the
//! ticket server it talks to, and a native API client.
//!
//! ## Modules
//!
//! - [`models`]: Wire types for tickets, users and statistics
//! - [`session`]: Session Store with pluggable persistence
//! - [`routing`]: Route table, menu and the authentication guard
//! - [`views`]: View models behind the dashboard, list, form and detail pages
//! - [`store`]: SQLite persistence (feature `server`)
//! - [`api`]: REST API server with Axum (feature `server`)
//! - [`client`]: Typed HTTP client (feature `client`)
//!
//! The core modules have no I/O runtime dependency and compile for the
//! browser with default features off.
//!
//! ## Quick Start
//!
//! ```rust
//! use aftersales::routing::{guard, GuardDecision, Route};
//! use aftersales::session::{MemoryStorage, SessionStore, FIXED_PASSWORD};
//!
//! let mut session = SessionStore::restored(MemoryStorage::default());
//! let target = "/tickets?status=OPEN";
//!
//! // Not logged in yet: bounced to the login page, remembering the target
//! let decision = guard(&session.status(), target);
//! assert!(matches!(decision, GuardDecision::Redirect(Route::Login { .. })));
//!
//! assert!(session.login("operator", FIXED_PASSWORD));
//! assert_eq!(
//!     guard(&session.status(), target),
//!     GuardDecision::Render(Route::resolve(target))
//! );
//! ```

pub mod config;
pub mod models;
pub mod routing;
pub mod session;
pub mod views;

#[cfg(feature = "runtime")]
pub mod logging;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod store;

#[cfg(feature = "client")]
pub mod client;

// Re-export top-level types for convenience
pub use models::{
    Ticket, TicketCreate, TicketListParams, TicketListResponse, TicketPriority,
    TicketStatistics, TicketStatus, TicketUpdate, User, UserRole, ValidationError,
};

pub use session::{AuthStatus, Session, SessionStorage, SessionStore};

pub use routing::{guard, GuardDecision, Route};

pub use config::{Config, ConfigError, LoggingConfig};

#[cfg(feature = "server")]
pub use api::{build_router, serve, ApiConfig, ApiError, AppState};
#[cfg(feature = "server")]
pub use store::{Store, StoreError};

#[cfg(feature = "client")]
pub use client::{ApiClient, ApiClientConfig, ClientError};

//! Session
//!
//! Client-side login state: a placeholder fixed-password check whose result
//! is persisted through a pluggable [`SessionStorage`] backend.
//!
//! ```rust
//! use aftersales::session::{MemoryStorage, SessionStore, FIXED_PASSWORD};
//!
//! let storage = MemoryStorage::new();
//! let mut store = SessionStore::restored(storage.clone());
//! assert!(store.login("alice", FIXED_PASSWORD));
//!
//! // A fresh store over the same storage sees the same user
//! let reloaded = SessionStore::restored(storage);
//! assert_eq!(reloaded.username(), Some("alice"));
//! ```

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, SessionError, SessionStorage};
pub use store::{AuthStatus, Session, SessionStore, AUTH_STORAGE_KEY, FIXED_PASSWORD};

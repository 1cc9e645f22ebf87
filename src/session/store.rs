//! Session Store
//!
//! Tracks who is logged in and persists that across reloads. Login is a
//! placeholder check against a fixed password: no hashing, no rate limiting,
//! no server round-trip.

use serde::{Deserialize, Serialize};

use super::storage::SessionStorage;

/// Storage key holding the serialized session
pub const AUTH_STORAGE_KEY: &str = "auth_user";

/// The only password accepted by [`SessionStore::login`]
pub const FIXED_PASSWORD: &str = "123456";

/// The logged-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
}

/// Authentication state as seen by the route guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// Session restore has not finished yet
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            AuthStatus::Authenticated(session) => Some(&session.username),
            _ => None,
        }
    }
}

/// Session state over an injected storage backend.
///
/// Storage failures are logged and swallowed: in-memory state always
/// follows the user's action even when persistence does not.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    session: Option<Session>,
    loading: bool,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Create a store in the loading state. Call [`restore`](Self::restore)
    /// before consulting it.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
            loading: true,
        }
    }

    /// Create a store and restore the persisted session immediately
    pub fn restored(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.restore();
        store
    }

    /// Read the persisted session.
    ///
    /// Unparseable data is removed and treated as logged out. The loading
    /// flag is cleared whatever happens.
    pub fn restore(&mut self) -> Option<&Session> {
        self.session = match self.storage.get_item(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => {
                    tracing::debug!(username = %session.username, "Restored session");
                    Some(session)
                }
                Err(e) => {
                    tracing::warn!("Discarding corrupted session data: {}", e);
                    if let Err(e) = self.storage.remove_item(AUTH_STORAGE_KEY) {
                        tracing::warn!("Failed to clear corrupted session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read persisted session: {}", e);
                None
            }
        };
        self.loading = false;
        self.session.as_ref()
    }

    /// Log in as `username`. Succeeds only for [`FIXED_PASSWORD`]; a
    /// rejected attempt leaves the current state untouched.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if password != FIXED_PASSWORD {
            tracing::info!(username = %username, "Login rejected");
            return false;
        }

        let session = Session {
            username: username.to_string(),
        };

        match serde_json::to_string(&session) {
            Ok(raw) => {
                if let Err(e) = self.storage.set_item(AUTH_STORAGE_KEY, &raw) {
                    tracing::warn!("Failed to persist session: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize session: {}", e),
        }

        tracing::info!(username = %session.username, "Logged in");
        self.session = Some(session);
        self.loading = false;
        true
    }

    /// Drop the session from memory and storage
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(username = %session.username, "Logged out");
        }
        if let Err(e) = self.storage.remove_item(AUTH_STORAGE_KEY) {
            tracing::warn!("Failed to remove persisted session: {}", e);
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn status(&self) -> AuthStatus {
        if self.loading {
            AuthStatus::Loading
        } else {
            match &self.session {
                Some(session) => AuthStatus::Authenticated(session.clone()),
                None => AuthStatus::Unauthenticated,
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::{FileStorage, MemoryStorage, SessionError};
    use tempfile::tempdir;

    /// Backend whose every operation fails
    struct BrokenStorage;

    impl SessionStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, SessionError> {
            Err(SessionError::Unavailable("disabled".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
            Err(SessionError::Backend("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), SessionError> {
            Err(SessionError::Backend("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_new_store_is_loading() {
        let store = SessionStore::new(MemoryStorage::new());
        assert!(store.is_loading());
        assert_eq!(store.status(), AuthStatus::Loading);
    }

    #[test]
    fn test_restore_empty_storage() {
        let mut store = SessionStore::new(MemoryStorage::new());
        assert!(store.restore().is_none());
        assert!(!store.is_loading());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn test_login_requires_fixed_password() {
        let mut store = SessionStore::restored(MemoryStorage::new());

        assert!(!store.login("alice", "wrong"));
        assert!(!store.is_authenticated());
        assert!(store.storage().peek(AUTH_STORAGE_KEY).is_none());

        assert!(store.login("alice", FIXED_PASSWORD));
        assert_eq!(store.username(), Some("alice"));
    }

    #[test]
    fn test_login_ignores_username() {
        for username in ["alice", "", "管理员", "a very long name with spaces"] {
            let mut store = SessionStore::restored(MemoryStorage::new());
            assert!(store.login(username, FIXED_PASSWORD));
            assert_eq!(store.username(), Some(username));
        }
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let mut store = SessionStore::restored(MemoryStorage::new());
        assert!(store.login("alice", FIXED_PASSWORD));

        assert!(!store.login("mallory", "guess"));
        assert_eq!(store.username(), Some("alice"));
        assert_eq!(
            store.storage().peek(AUTH_STORAGE_KEY).as_deref(),
            Some(r#"{"username":"alice"}"#)
        );
    }

    #[test]
    fn test_session_survives_reload() {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::restored(storage.clone());
        assert!(store.login("bob", FIXED_PASSWORD));
        drop(store);

        let mut reloaded = SessionStore::new(storage);
        let restored = reloaded.restore().cloned();
        assert_eq!(
            restored,
            Some(Session {
                username: "bob".to_string()
            })
        );
        assert_eq!(
            reloaded.status(),
            AuthStatus::Authenticated(Session {
                username: "bob".to_string()
            })
        );
    }

    #[test]
    fn test_logout_clears_persisted_session() {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::restored(storage.clone());
        assert!(store.login("bob", FIXED_PASSWORD));

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);

        let mut reloaded = SessionStore::new(storage);
        assert!(reloaded.restore().is_none());
    }

    #[test]
    fn test_corrupted_session_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set_item(AUTH_STORAGE_KEY, "{not json").unwrap();

        let mut store = SessionStore::new(storage.clone());
        assert!(store.restore().is_none());
        assert!(!store.is_loading());
        assert!(storage.peek(AUTH_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_wrong_shape_is_treated_as_corrupted() {
        let storage = MemoryStorage::new();
        storage.set_item(AUTH_STORAGE_KEY, "null").unwrap();

        let store = SessionStore::restored(storage.clone());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
        assert!(storage.peek(AUTH_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_storage_failures_do_not_block_state_changes() {
        let mut store = SessionStore::new(BrokenStorage);
        assert!(store.restore().is_none());
        assert!(!store.is_loading());

        assert!(store.login("carol", FIXED_PASSWORD));
        assert_eq!(store.username(), Some("carol"));

        store.logout();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_file_backed_session_survives_reload() {
        let dir = tempdir().unwrap();

        let mut store = SessionStore::restored(FileStorage::new(dir.path()));
        assert!(store.login("dave", FIXED_PASSWORD));

        let reloaded = SessionStore::restored(FileStorage::new(dir.path()));
        assert_eq!(reloaded.username(), Some("dave"));
    }
}

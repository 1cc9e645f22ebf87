//! Authentication context
//!
//! Wraps the core [`SessionStore`] over the browser's `localStorage` and
//! mirrors its status into a signal so guarded routes re-render on login
//! and logout.

use std::cell::RefCell;
use std::rc::Rc;

use aftersales::session::{AuthStatus, SessionError, SessionStorage, SessionStore};
use leptos::*;

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, SessionError> {
        web_sys::window()
            .ok_or_else(|| SessionError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| SessionError::Unavailable("localStorage disabled".to_string()))
    }
}

impl SessionStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| SessionError::Backend(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| SessionError::Backend(format!("{:?}", e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| SessionError::Backend(format!("{:?}", e)))
    }
}

/// Session shared through context
#[derive(Clone)]
pub struct AuthContext {
    store: Rc<RefCell<SessionStore<LocalStorage>>>,
    pub status: RwSignal<AuthStatus>,
}

impl AuthContext {
    pub fn login(&self, username: &str, password: &str) -> bool {
        let ok = self.store.borrow_mut().login(username, password);
        self.sync();
        ok
    }

    pub fn logout(&self) {
        self.store.borrow_mut().logout();
        self.sync();
    }

    pub fn username(&self) -> Option<String> {
        self.status.with(|s| s.username().map(String::from))
    }

    fn sync(&self) {
        self.status.set(self.store.borrow().status());
    }
}

/// Restore the persisted session and provide it to the component tree
pub fn provide_auth() {
    let store = SessionStore::new(LocalStorage);
    let auth = AuthContext {
        store: Rc::new(RefCell::new(store)),
        status: create_rw_signal(AuthStatus::Loading),
    };

    // Restore runs once the tree is mounted; guarded routes show a spinner
    // until then
    let for_restore = auth.clone();
    create_effect(move |ran: Option<()>| {
        if ran.is_none() {
            for_restore.store.borrow_mut().restore();
            for_restore.sync();
        }
    });

    provide_context(auth);
}

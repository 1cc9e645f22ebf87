//! Ticket Store
//!
//! SQLite persistence for tickets and users. A single connection sits
//! behind a `std::sync::Mutex` (rusqlite connections are not `Sync`); each
//! operation holds the lock for one short critical section.
//!
//! # Example
//!
//! ```rust
//! use aftersales::models::{HandleType, SystemSource, TicketCategory, TicketCreate, TicketPriority};
//! use aftersales::store::Store;
//!
//! let store = Store::open_in_memory()?;
//! let ticket = store.create_ticket(&TicketCreate {
//!     system_source: SystemSource::Tms,
//!     category: TicketCategory::SystemFailure,
//!     description: "Waybill sync stuck".to_string(),
//!     handle_type: HandleType::Dev,
//!     handle_detail: String::new(),
//!     priority: TicketPriority::P1,
//!     tags: vec![],
//!     solution_template: None,
//!     assigned_to: None,
//!     created_by: Some("alice".to_string()),
//! })?;
//! assert_eq!(store.get_ticket(&ticket.id)?.description, "Waybill sync stuck");
//! # Ok::<(), aftersales::store::StoreError>(())
//! ```

pub mod error;
mod tickets;
mod users;

pub use error::{StoreError, StoreResult};
pub use tickets::DescriptionMatcher;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS tickets (
        id TEXT PRIMARY KEY,
        system_source TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        handle_type TEXT NOT NULL,
        handle_detail TEXT NOT NULL DEFAULT '',
        priority TEXT NOT NULL,
        status TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        solution_template TEXT,
        created_by TEXT,
        assigned_to TEXT,
        ai_metadata TEXT NOT NULL DEFAULT '{}',
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        closed_at INTEGER
    );
    CREATE INDEX IF NOT EXISTS idx_tickets_created ON tickets(created_at);
    CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);

    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
";

/// SQLite-backed ticket and user store
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Create or open a database file, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        tracing::info!(path = %path.display(), "Opened ticket database");
        Self::init(conn, Some(path))
    }

    /// Private in-memory database, used by tests and `--memory` runs
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Cheap round trip used by the readiness check
    pub fn ping(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {}", ms)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tickets.db");

        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
        store.ping().unwrap();
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.db");

        drop(Store::open(&path).unwrap());
        Store::open(&path).unwrap().ping().unwrap();
    }

    #[test]
    fn test_millis_roundtrip() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(from_millis(to_millis(at)).unwrap(), at);
    }
}

// Store layer: SQLite storage for document vectors, token weights,
// document info and global terms.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. Every top-level operation opens its own connection through
// `open` and drops it when done; nothing holds a connection across calls.

pub mod models;
pub mod queries;
pub mod schema;
pub mod store;

pub use store::VectorStore;

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

/// Open (or create) the database file and apply connection pragmas.
///
/// Parent directories are created if needed.
pub fn open(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let conn = Connection::open(db_path).map_err(|source| Error::StoreOpen {
        path: db_path.to_path_buf(),
        source,
    })?;

    // WAL keeps readers unblocked while an ingestion batch is writing
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    debug!(path = %db_path.display(), "Opened store connection");
    Ok(conn)
}

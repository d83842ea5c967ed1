use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::StorageError;

const CREATE_LEADS: &str = "CREATE TABLE IF NOT EXISTS leads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    property_type TEXT NOT NULL,
    project_name TEXT,
    address TEXT NOT NULL,
    area TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    owner_name TEXT NOT NULL,
    price TEXT NOT NULL,
    cheque TEXT,
    size TEXT NOT NULL,
    comments TEXT NOT NULL
)";

/// Open (creating if needed) the database at `path` and make sure the `leads`
/// table exists. `AUTOINCREMENT` keeps identifiers monotonic even after the
/// newest row is deleted.
pub fn ensure_schema(path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    conn.execute(CREATE_LEADS, [])?;
    info!(path = %path.display(), "lead database ready");
    Ok(conn)
}

/// Same schema on a throwaway in-memory database.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory()?;
    conn.execute(CREATE_LEADS, [])?;
    Ok(conn)
}

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::error::StoreError;

/// Current schema version, stored in `PRAGMA user_version`. Bumping it drops
/// and recreates the movies table, so existing rows do not survive.
pub const SCHEMA_VERSION: i32 = 1;

const CREATE_MOVIES_SQL: &str = "CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    genre TEXT NOT NULL,
    priority TEXT NOT NULL,
    release_year TEXT,
    description TEXT NOT NULL DEFAULT '',
    image BLOB
)";

/// Open (or create) the catalog database at `path`, creating the parent
/// directory on first run, and bring the schema to [`SCHEMA_VERSION`].
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    debug!("opened catalog database at {}", path.display());
    prepare_connection(&conn)?;
    Ok(conn)
}

/// Open a private in-memory catalog. Used by tests and throwaway sessions.
pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    prepare_connection(&conn)?;
    Ok(conn)
}

fn prepare_connection(conn: &Connection) -> Result<(), StoreError> {
    register_fold_case(conn)?;
    ensure_schema(conn)
}

/// `fold_case(text)` lowercases with full Unicode rules so store-side title
/// search matches the client-side search in the view controller.
fn register_fold_case(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: String = ctx.get(0)?;
            Ok(text.to_lowercase())
        },
    )?;
    Ok(())
}

/// Create the table on a fresh database, rebuild it on an older version and
/// refuse to touch a database written by a newer build. A version of 0 with a
/// leftover `movies` table is treated like any other old version.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    let found = schema_version(conn)?;

    if found > SCHEMA_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        });
    }

    if found == SCHEMA_VERSION {
        return Ok(());
    }

    if found == 0 {
        info!("creating movies table (schema v{SCHEMA_VERSION})");
    } else {
        warn!(
            "upgrading catalog schema v{found} -> v{SCHEMA_VERSION}; existing movies are dropped"
        );
    }

    conn.execute("DROP TABLE IF EXISTS movies", [])?;
    conn.execute(CREATE_MOVIES_SQL, [])?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

/// Read `PRAGMA user_version`; 0 means the schema was never created.
pub fn schema_version(conn: &Connection) -> Result<i32, StoreError> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

use thiserror::Error;

use crate::models::ValidationError;

/// Failures raised by the persistence layer. "Not found" is not one of them:
/// lookups return `Option` and mutations return whether a row was touched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database schema version {found} is newer than supported version {expected}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("catalog store lock poisoned")]
    LockPoisoned,
}

/// Error surfaced by the view controller's inbound operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

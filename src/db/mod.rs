//! Persistence module split across logical submodules. `SqliteStore` is the
//! handle the rest of the crate uses; the free functions underneath take a
//! plain `Connection` so they can be exercised directly.

mod connection;
pub mod filter;
mod movies;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::StoreError;
use crate::models::{Movie, MovieDraft};

pub use connection::{ensure_schema, open_database, open_memory, schema_version, SCHEMA_VERSION};
pub use filter::MovieQuery;
pub use movies::{count_movies, delete_movie, find_movie, insert_movie, query_movies, update_movie};

/// Durable CRUD over movies plus filtered reads. The view controller only
/// talks to this trait.
///
/// Callers validate drafts before handing them over; implementations do not
/// re-check title, year, genre or priority.
pub trait CatalogStore {
    /// Persist a new movie and return its assigned id.
    fn create(&self, draft: &MovieDraft) -> Result<i64, StoreError>;
    fn get_by_id(&self, id: i64) -> Result<Option<Movie>, StoreError>;
    /// Full replace keyed by `movie.id`; `false` when the id is unknown.
    fn update(&self, movie: &Movie) -> Result<bool, StoreError>;
    /// `true` if a row was removed.
    fn delete(&self, id: i64) -> Result<bool, StoreError>;
    fn query(&self, query: &MovieQuery) -> Result<Vec<Movie>, StoreError>;
}

/// SQLite-backed store. One mutex guards the connection, which serializes
/// writes and keeps reads from seeing a half-applied mutation.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database file at `path`, creating or upgrading the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    /// Fresh in-memory store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::from_connection(open_memory()?))
    }

    /// Wrap a connection whose schema is already in place.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        count_movies(&*self.lock()?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl CatalogStore for SqliteStore {
    fn create(&self, draft: &MovieDraft) -> Result<i64, StoreError> {
        insert_movie(&*self.lock()?, draft)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        find_movie(&*self.lock()?, id)
    }

    fn update(&self, movie: &Movie) -> Result<bool, StoreError> {
        update_movie(&*self.lock()?, movie)
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        delete_movie(&*self.lock()?, id)
    }

    fn query(&self, query: &MovieQuery) -> Result<Vec<Movie>, StoreError> {
        query_movies(&*self.lock()?, query)
    }
}

impl<S: CatalogStore + ?Sized> CatalogStore for &S {
    fn create(&self, draft: &MovieDraft) -> Result<i64, StoreError> {
        (**self).create(draft)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        (**self).get_by_id(id)
    }

    fn update(&self, movie: &Movie) -> Result<bool, StoreError> {
        (**self).update(movie)
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn query(&self, query: &MovieQuery) -> Result<Vec<Movie>, StoreError> {
        (**self).query(query)
    }
}

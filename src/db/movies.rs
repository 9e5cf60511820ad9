use log::debug;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::StoreError;
use crate::models::{Movie, MovieDraft};

use super::filter::MovieQuery;

const MOVIE_COLUMNS: &str = "id, title, genre, priority, release_year, description, image";

/// Insert a movie and return its newly assigned id. The draft has no id, so
/// whatever identity the caller had in mind is never written.
pub fn insert_movie(conn: &Connection, draft: &MovieDraft) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO movies (title, genre, priority, release_year, description, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            draft.title,
            draft.genre,
            draft.priority,
            draft.release_year,
            draft.description,
            draft.image,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!("inserted movie {id}");
    Ok(id)
}

/// Look up one movie. Absence is `Ok(None)`, never an error.
pub fn find_movie(conn: &Connection, id: i64) -> Result<Option<Movie>, StoreError> {
    let movie = conn
        .query_row(
            &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ?1"),
            params![id],
            row_to_movie,
        )
        .optional()?;
    Ok(movie)
}

/// Replace every field of the row keyed by `movie.id`. Returns `false` when
/// no such row exists.
pub fn update_movie(conn: &Connection, movie: &Movie) -> Result<bool, StoreError> {
    let updated = conn.execute(
        "UPDATE movies
         SET title = ?1, genre = ?2, priority = ?3, release_year = ?4,
             description = ?5, image = ?6
         WHERE id = ?7",
        params![
            movie.title,
            movie.genre,
            movie.priority,
            movie.release_year,
            movie.description,
            movie.image,
            movie.id,
        ],
    )?;

    debug!("update movie {}: {updated} row(s)", movie.id);
    Ok(updated > 0)
}

/// Remove a movie. Returns whether a row was actually deleted, so a repeat
/// call is harmless and reports `false`.
pub fn delete_movie(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    let deleted = conn.execute("DELETE FROM movies WHERE id = ?1", params![id])?;
    debug!("delete movie {id}: {deleted} row(s)");
    Ok(deleted > 0)
}

/// Run a filtered read. Rows come back in id order, which is insertion order.
pub fn query_movies(conn: &Connection, query: &MovieQuery) -> Result<Vec<Movie>, StoreError> {
    let builder = query.to_builder();
    let sql = format!(
        "SELECT {MOVIE_COLUMNS} FROM movies{} ORDER BY id",
        builder.where_clause()
    );

    let mut stmt = conn.prepare(&sql)?;
    let movies = stmt
        .query_map(params_from_iter(builder.params()), row_to_movie)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!("query {query:?} returned {} movie(s)", movies.len());
    Ok(movies)
}

/// Total number of stored movies.
pub fn count_movies(conn: &Connection) -> Result<usize, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
    Ok(count as usize)
}

fn row_to_movie(row: &Row<'_>) -> rusqlite::Result<Movie> {
    Ok(Movie {
        id: row.get(0)?,
        title: row.get(1)?,
        genre: row.get(2)?,
        priority: row.get(3)?,
        release_year: row.get(4)?,
        description: row.get(5)?,
        image: row.get(6)?,
    })
}

//! View controller that keeps the presentation list in line with the store.
//!
//! Two freshness tiers are in play. A structured filter (genre or priority)
//! is a discrete event and always re-queries the store, so it reflects exact
//! equality against durable data. Search text changes on every keystroke and
//! only narrows the cached base list from the last store read. The list shown
//! is therefore `search(store.query(filter))` as of the last recompute.

use std::fmt;

use log::{debug, warn};

use crate::config::CatalogConfig;
use crate::db::{CatalogStore, MovieQuery};
use crate::error::{CatalogError, StoreError};
use crate::models::{Movie, MovieDraft};

/// Which column a structured filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Genre,
    Priority,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 2] = [FilterDimension::Genre, FilterDimension::Priority];

    pub fn label(self) -> &'static str {
        match self {
            FilterDimension::Genre => "Genre",
            FilterDimension::Priority => "Priority",
        }
    }

    /// The values a user can pick for this dimension.
    pub fn options(self, config: &CatalogConfig) -> &[String] {
        match self {
            FilterDimension::Genre => &config.genres,
            FilterDimension::Priority => &config.priorities,
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single equality filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub dimension: FilterDimension,
    pub value: String,
}

impl ActiveFilter {
    pub fn genre(value: impl Into<String>) -> Self {
        Self {
            dimension: FilterDimension::Genre,
            value: value.into(),
        }
    }

    pub fn priority(value: impl Into<String>) -> Self {
        Self {
            dimension: FilterDimension::Priority,
            value: value.into(),
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dimension, self.value)
    }
}

/// Search text plus an optional structured filter. Lives as long as the
/// screen session and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub filter: Option<ActiveFilter>,
}

impl FilterState {
    /// Store-side part of the state. Search is deliberately left out; it is
    /// applied client-side over the result.
    fn store_query(&self) -> MovieQuery {
        match &self.filter {
            None => MovieQuery::all(),
            Some(active) => match active.dimension {
                FilterDimension::Genre => MovieQuery::all().with_genre(active.value.clone()),
                FilterDimension::Priority => {
                    MovieQuery::all().with_priority(active.value.clone())
                }
            },
        }
    }

    fn matches_search(&self, movie: &Movie) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        movie
            .title
            .to_lowercase()
            .contains(&self.search_text.to_lowercase())
    }

    pub fn is_narrowed(&self) -> bool {
        self.filter.is_some() || !self.search_text.is_empty()
    }
}

/// Outcome of the last recompute, as shown to the display layer. `Empty` is
/// a successful read with nothing to show; `Failed` means the list on screen
/// is the previous one and the store call did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Ready,
    Empty,
    Failed(String),
}

/// Sole owner and writer of the presentation list.
#[derive(Debug)]
pub struct CatalogView<S: CatalogStore> {
    store: S,
    config: CatalogConfig,
    state: FilterState,
    /// Last successful store read for the active structured filter.
    base: Vec<Movie>,
    movies: Vec<Movie>,
    status: ViewStatus,
}

impl<S: CatalogStore> CatalogView<S> {
    /// Build an empty view. Nothing is read until [`Self::on_screen_active`].
    pub fn new(store: S, config: CatalogConfig) -> Self {
        Self {
            store,
            config,
            state: FilterState::default(),
            base: Vec::new(),
            movies: Vec::new(),
            status: ViewStatus::Empty,
        }
    }

    /// The ordered list to display.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Re-read from the store under the active filter. Call on every return
    /// to the list, since edits and deletes may have happened elsewhere.
    pub fn on_screen_active(&mut self) -> Result<(), StoreError> {
        self.reload()
    }

    /// Generic "something changed, re-fetch" signal.
    pub fn notify_mutated(&mut self) -> Result<(), StoreError> {
        self.reload()
    }

    /// Narrow the cached list by title. Does not touch the store.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
        self.apply_search();
    }

    /// Switch the structured filter and re-query. On failure the previous
    /// filter and list stay in place.
    pub fn set_filter(&mut self, filter: Option<ActiveFilter>) -> Result<(), StoreError> {
        let previous = std::mem::replace(&mut self.state.filter, filter);
        if let Err(err) = self.reload() {
            self.state.filter = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn clear_filter(&mut self) -> Result<(), StoreError> {
        self.set_filter(None)
    }

    /// Drop `id` from the list right away, then reconcile with the store.
    pub fn notify_deleted(&mut self, id: i64) -> Result<(), StoreError> {
        self.base.retain(|movie| movie.id != id);
        self.movies.retain(|movie| movie.id != id);
        self.reload()
    }

    /// Validate and persist a new movie, then refresh the list. Once the row
    /// is written the id is returned even if the refresh fails; that failure
    /// only shows up in [`CatalogView::status`].
    pub fn add(&mut self, draft: MovieDraft) -> Result<i64, CatalogError> {
        draft.validate(&self.config)?;
        let id = match self.store.create(&draft) {
            Ok(id) => id,
            Err(err) => return Err(self.fail(err).into()),
        };
        self.refresh_after_write();
        Ok(id)
    }

    /// Replace every field of movie `id`. `Ok(false)` when it no longer exists.
    pub fn update(&mut self, id: i64, draft: MovieDraft) -> Result<bool, CatalogError> {
        draft.validate(&self.config)?;
        let movie = Movie::from_draft(id, draft);
        let found = match self.store.update(&movie) {
            Ok(found) => found,
            Err(err) => return Err(self.fail(err).into()),
        };
        self.refresh_after_write();
        Ok(found)
    }

    /// Delete movie `id`. `Ok(false)` when it was already gone.
    pub fn delete(&mut self, id: i64) -> Result<bool, CatalogError> {
        let removed = match self.store.delete(id) {
            Ok(removed) => removed,
            Err(err) => return Err(self.fail(err).into()),
        };
        if let Err(err) = self.notify_deleted(id) {
            debug!("movie {id} deleted but the list refresh failed: {err}");
        }
        Ok(removed)
    }

    /// The write already committed; a failed re-read stays in `status`.
    fn refresh_after_write(&mut self) {
        if let Err(err) = self.reload() {
            debug!("write committed but the list refresh failed: {err}");
        }
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        let query = self.state.store_query();
        match self.store.query(&query) {
            Ok(movies) => {
                debug!("reloaded {} movie(s) for {:?}", movies.len(), self.state.filter);
                self.base = movies;
                self.status = ViewStatus::Ready;
                self.apply_search();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn apply_search(&mut self) {
        self.movies = self
            .base
            .iter()
            .filter(|movie| self.state.matches_search(movie))
            .cloned()
            .collect();
        // A stale cache keeps its failure signal until a store read succeeds.
        if matches!(self.status, ViewStatus::Failed(_)) {
            return;
        }
        self.status = if self.movies.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        };
    }

    /// Record a store failure without touching the list.
    fn fail(&mut self, err: StoreError) -> StoreError {
        warn!("catalog store call failed: {err}");
        self.status = ViewStatus::Failed(err.to_string());
        err
    }
}

//! Core library surface for the movie catalog.
//!
//! `db` owns persistence and filtered reads, `view` keeps the presentation
//! list in sync with it, and `ui` is the terminal front-end built on both.
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ui;
pub mod view;

/// The persistence entry points used by `main.rs` and the integration tests.
pub use db::{CatalogStore, MovieQuery, SqliteStore};

pub use config::CatalogConfig;
pub use error::{CatalogError, StoreError};
pub use models::{Movie, MovieDraft, Poster, ValidationError};
pub use view::{ActiveFilter, CatalogView, FilterDimension, FilterState, ViewStatus};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

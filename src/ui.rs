//! Ratatui front-end for the movie catalog. It renders whatever the view
//! controller holds and forwards user intent (search, filter, add, edit,
//! delete) back to it; it never touches the store directly.

mod app;
mod forms;
mod helpers;
pub mod images;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;

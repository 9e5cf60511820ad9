//! Binary entry point: load config, open the SQLite catalog, and drive the
//! Ratatui event loop until the user exits.
use std::fs::{self, File};

use anyhow::{Context, Result};
use log::info;
use movie_catalog::{run_app, App, CatalogConfig, CatalogView, SqliteStore};

/// Log file written next to the database; stderr belongs to the TUI.
const LOG_FILE_NAME: &str = "catalog.log";

fn main() -> Result<()> {
    let dirs = movie_catalog::config::project_dirs()?;
    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("failed to create data directory")?;

    init_logging(&data_dir.join(LOG_FILE_NAME))?;

    let config = CatalogConfig::load(dirs.config_dir())?;
    let db_path = config.database_path_in(data_dir);
    info!("opening catalog at {}", db_path.display());
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open catalog at {}", db_path.display()))?;

    let mut app = App::new(CatalogView::new(store, config));
    run_app(&mut app)
}

/// Route `log` output to a file, honouring `RUST_LOG` (default `info`).
fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

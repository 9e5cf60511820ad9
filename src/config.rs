use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// File name of the JSON config inside the config directory.
const CONFIG_FILENAME: &str = "config.json";
/// SQLite file name used when no explicit path is configured.
const DB_FILE_NAME: &str = "movies.sqlite";

/// User-tunable settings. Missing keys fall back to the defaults so a config
/// file only needs the values that differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Explicit database location. `None` uses the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Allowed genres, in the order the form cycles through them.
    #[serde(default = "default_genres")]
    pub genres: Vec<String>,

    /// Allowed priorities, in the order the form cycles through them.
    #[serde(default = "default_priorities")]
    pub priorities: Vec<String>,
}

fn default_genres() -> Vec<String> {
    [
        "Action",
        "Adventure",
        "Animation",
        "Comedy",
        "Documentary",
        "Drama",
        "Horror",
        "Romance",
        "Science Fiction",
        "Thriller",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_priorities() -> Vec<String> {
    ["High", "Medium", "Low"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            genres: default_genres(),
            priorities: default_priorities(),
        }
    }
}

impl CatalogConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: CatalogConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory.
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir).context("failed to create config directory")?;

        let content =
            serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).context("failed to write config")?;
        Ok(())
    }

    /// The form and the filter picker both need at least one choice per set.
    pub fn validate(&self) -> Result<()> {
        if self.genres.is_empty() {
            bail!("config must list at least one genre");
        }
        if self.priorities.is_empty() {
            bail!("config must list at least one priority");
        }
        Ok(())
    }

    /// Where the SQLite file lives: the configured path, or the default file
    /// inside `data_dir`.
    pub fn database_path_in(&self, data_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir.join(DB_FILE_NAME))
    }
}

/// Resolve the platform config and data directories for the application.
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "movie-catalog")
        .ok_or_else(|| anyhow!("could not locate home directory"))
}

//! Engine configuration, loadable from a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{TABLE_MAX_PAGES, error::DatabaseError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Database file to open or create.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Upper bound on the number of pages in the file.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Where the interactive REPL keeps its line history.
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("celldb.db")
}

fn default_max_pages() -> u32 {
    TABLE_MAX_PAGES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_pages: default_max_pages(),
            history_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, DatabaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, DatabaseError> {
        let config: Self = toml::from_str(content).map_err(|e| DatabaseError::InvalidConfig {
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.max_pages == 0 {
            return Err(DatabaseError::InvalidConfig {
                details: "max_pages must be at least 1".to_string(),
            });
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(DatabaseError::InvalidConfig {
                details: "db_path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }
}

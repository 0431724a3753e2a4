use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{
    config::Config,
    executor::Executor,
    storage::storage_manager::StorageManager,
    types::{TABLE_MAX_PAGES, error::DatabaseError},
};

/// A database file in a private temporary directory, removed on drop.
pub struct TempDatabase {
    dir: TempDir,
    path: PathBuf,
    max_pages: u32,
}

impl TempDatabase {
    pub fn new() -> std::io::Result<Self> {
        Self::with_max_pages(TABLE_MAX_PAGES)
    }

    pub fn with_max_pages(max_pages: u32) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("celldb_test").tempdir()?;
        let path = dir.path().join("test.db");
        Ok(Self {
            dir,
            path,
            max_pages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> Config {
        Config::new()
            .with_db_path(&self.path)
            .with_max_pages(self.max_pages)
    }

    /// Opens (or reopens) the database file. Close the previous handle first,
    /// otherwise its cached pages are never written.
    pub fn create_storage_manager(&self) -> Result<StorageManager, DatabaseError> {
        StorageManager::with_config(&self.config())
    }

    pub fn create_executor(&self) -> Result<Executor, DatabaseError> {
        Executor::open(&self.config())
    }
}

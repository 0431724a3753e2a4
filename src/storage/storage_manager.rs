use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    config::Config,
    executor::{
        insert::{Inserter, TableInserter},
        scan::Scanner,
        sequential_scan::SequentialScanner,
    },
    storage::{bplus_tree::BPlusTree, pager::Pager},
    types::{Key, PageNum, TABLE_MAX_PAGES, error::DatabaseError, row::Row},
};

const SCAN_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub path: PathBuf,
    pub page_count: u32,
    pub max_pages: u32,
    pub file_size: u64,
    pub root_page_num: PageNum,
}

/// Entry point to the storage layer: one database file holding one table.
pub struct StorageManager {
    tree: BPlusTree,
}

impl StorageManager {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        Self::open(path, TABLE_MAX_PAGES)
    }

    pub fn with_config(config: &Config) -> Result<Self, DatabaseError> {
        config.validate()?;
        Self::open(&config.db_path, config.max_pages)
    }

    pub fn open<P: AsRef<Path>>(path: P, max_pages: u32) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        if path.exists() {
            info!(path = %path.display(), "opening existing database");
        } else {
            info!(path = %path.display(), "creating new database");
        }
        let pager = Pager::open(path, max_pages)?;
        let tree = BPlusTree::open(pager)?;
        Ok(Self { tree })
    }

    pub fn db_info(&self) -> DatabaseInfo {
        let pager = self.tree.pager();
        DatabaseInfo {
            path: pager.path().to_path_buf(),
            page_count: pager.num_pages(),
            max_pages: pager.max_pages(),
            file_size: pager.file_length(),
            root_page_num: self.tree.root_page_num(),
        }
    }

    pub fn tree(&mut self) -> &mut BPlusTree {
        &mut self.tree
    }

    pub fn insert_row(&mut self, row: &Row) -> Result<(), DatabaseError> {
        row.validate()?;
        self.tree.insert(row.id, row)
    }

    /// Inserts rows in order. On failure the rows before the failing one stay
    /// inserted.
    pub fn insert_batch(&mut self, rows: Vec<Row>) -> Result<usize, DatabaseError> {
        let mut inserter = self.create_inserter();
        inserter.insert_batch(rows)?;
        Ok(inserter.rows_inserted())
    }

    pub fn get_row(&mut self, id: Key) -> Result<Option<Row>, DatabaseError> {
        self.tree.get(id)
    }

    /// Create a table inserter bound to this database's table
    pub fn create_inserter(&mut self) -> TableInserter<'_> {
        TableInserter::new(&mut self.tree)
    }

    /// Create a sequential scanner over every row in key order
    pub fn create_scanner(&mut self) -> SequentialScanner<'_> {
        SequentialScanner::new(&mut self.tree)
    }

    pub fn scan_table(&mut self) -> Result<Vec<Row>, DatabaseError> {
        let mut scanner = self.create_scanner();
        let mut rows = Vec::new();
        loop {
            let batch = scanner.scan_batch(SCAN_BATCH_SIZE)?;
            if batch.is_empty() {
                return Ok(rows);
            }
            rows.extend(batch);
        }
    }

    /// Flushes every cached page. Without this, changes made in the session are lost.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.tree.close()
    }
}

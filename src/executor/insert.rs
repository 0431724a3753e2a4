use tracing::debug;

use crate::{
    storage::bplus_tree::BPlusTree,
    types::{error::DatabaseError, row::Row},
};

/// Trait for handling row insertion into the table
pub trait Inserter {
    /// Insert a single row into the table
    fn insert(&mut self, row: Row) -> Result<(), DatabaseError>;

    /// Insert rows in order, stopping at the first failure. Rows before the
    /// failing one stay inserted.
    fn insert_batch(&mut self, rows: Vec<Row>) -> Result<(), DatabaseError>;

    /// Number of rows this inserter has written so far
    fn rows_inserted(&self) -> usize;
}

pub struct TableInserter<'a> {
    tree: &'a mut BPlusTree,
    rows_inserted: usize,
}

impl<'a> TableInserter<'a> {
    pub fn new(tree: &'a mut BPlusTree) -> Self {
        Self {
            tree,
            rows_inserted: 0,
        }
    }
}

impl Inserter for TableInserter<'_> {
    fn insert(&mut self, row: Row) -> Result<(), DatabaseError> {
        row.validate()?;
        self.tree.insert(row.id, &row)?;
        self.rows_inserted += 1;
        Ok(())
    }

    fn insert_batch(&mut self, rows: Vec<Row>) -> Result<(), DatabaseError> {
        if rows.is_empty() {
            return Ok(());
        }
        let total = rows.len();
        for row in rows {
            self.insert(row)?;
        }
        debug!(total, "inserted batch");
        Ok(())
    }

    fn rows_inserted(&self) -> usize {
        self.rows_inserted
    }
}

/// Iterator wrapper for batch insertion operations
pub struct InsertIterator<I: Inserter> {
    inserter: I,
}

impl<I: Inserter> InsertIterator<I> {
    pub fn new(inserter: I) -> Self {
        Self { inserter }
    }

    pub fn insert_row(&mut self, row: Row) -> Result<(), DatabaseError> {
        self.inserter.insert(row)
    }

    pub fn insert_rows(&mut self, rows: Vec<Row>) -> Result<(), DatabaseError> {
        self.inserter.insert_batch(rows)
    }

    pub fn rows_inserted(&self) -> usize {
        self.inserter.rows_inserted()
    }
}

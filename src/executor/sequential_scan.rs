use tracing::debug;

use crate::{
    executor::scan::Scanner,
    storage::{bplus_tree::BPlusTree, cursor::Cursor},
    types::{PageNum, error::DatabaseError, page::NodeType, row::Row},
};

/// Walks the table's leaves left to right, yielding rows in key order.
///
/// Leaves carry no sibling pointers, so the scanner keeps the chain of
/// internal nodes above the current leaf together with the index of the next
/// child to visit in each.
pub struct SequentialScanner<'a> {
    tree: &'a mut BPlusTree,
    stack: Vec<(PageNum, usize)>,
    leaf: Option<Cursor>,
    is_exhausted: bool,
}

impl<'a> SequentialScanner<'a> {
    pub fn new(tree: &'a mut BPlusTree) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            leaf: None,
            is_exhausted: false,
        }
    }

    fn descend_leftmost(&mut self, mut page_num: PageNum) -> Result<Cursor, DatabaseError> {
        loop {
            let node = self.tree.node(page_num)?;
            match node.node_type()? {
                NodeType::Leaf => {
                    let end_of_table = node.leaf_num_cells() == 0;
                    return Ok(Cursor {
                        page_num,
                        cell_num: 0,
                        end_of_table,
                    });
                }
                NodeType::Internal => {
                    let child = self.tree.child(page_num, 0)?;
                    self.stack.push((page_num, 1));
                    if self.stack.len() > self.tree.pager().num_pages() as usize {
                        return Err(DatabaseError::CorruptedPage {
                            page_num,
                            reason: "Cycle detected while scanning the tree".to_string(),
                        });
                    }
                    page_num = child;
                }
            }
        }
    }

    /// Moves to the leftmost leaf of the next unvisited subtree, or `None`
    /// once every child of every ancestor has been visited.
    fn advance_leaf(&mut self) -> Result<Option<Cursor>, DatabaseError> {
        while let Some((page_num, next_child)) = self.stack.pop() {
            let num_keys = self.tree.node(page_num)?.internal_num_keys() as usize;
            if next_child <= num_keys {
                let child = self.tree.child(page_num, next_child)?;
                self.stack.push((page_num, next_child + 1));
                return self.descend_leftmost(child).map(Some);
            }
        }
        Ok(None)
    }
}

impl Scanner for SequentialScanner<'_> {
    fn scan(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.is_exhausted {
            return Ok(None);
        }
        if self.leaf.is_none() {
            let root = self.tree.root_page_num();
            self.leaf = Some(self.descend_leftmost(root)?);
        }

        while let Some(mut cursor) = self.leaf {
            let node = self.tree.node(cursor.page_num)?;
            if cursor.cell_num < node.leaf_num_cells() {
                let row = Row::from_bytes(node.leaf_value(cursor.cell_num as usize))?;
                cursor.cell_num += 1;
                cursor.end_of_table = cursor.cell_num >= node.leaf_num_cells();
                self.leaf = Some(cursor);
                return Ok(Some(row));
            }
            debug!(page_num = cursor.page_num, "leaf exhausted, moving to next");
            self.leaf = self.advance_leaf()?;
        }

        self.is_exhausted = true;
        Ok(None)
    }

    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError> {
        let mut rows = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            match self.scan()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    fn reset(&mut self) -> Result<(), DatabaseError> {
        self.stack.clear();
        self.leaf = None;
        self.is_exhausted = false;
        Ok(())
    }
}

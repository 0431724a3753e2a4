use tracing::{debug, info};

use crate::{
    storage::{
        cursor::{Cursor, PathEntry},
        pager::Pager,
    },
    types::{
        INTERNAL_NODE_MAX_KEYS, Key, LEAF_NODE_CELL_SIZE, LEAF_NODE_LEFT_SPLIT_COUNT,
        LEAF_NODE_MAX_CELLS, LEAF_NODE_RIGHT_SPLIT_COUNT, PageNum, ROW_SIZE,
        error::DatabaseError,
        page::{NodeType, Page},
        row::Row,
    },
};

/// Overflow record handed up the tree when a node splits: the page that split
/// keeps the lower half (with a new maximum key) and `right_page` holds the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitResult {
    pub left_page: PageNum,
    pub left_max: Key,
    pub right_page: PageNum,
}

/// A single table stored as a B+ tree of pager pages, keyed on the row id.
///
/// Rows live only in leaves. Internal entries hold the maximum key of the
/// child they point to, and the right child holds everything larger. Nodes
/// refer to each other purely by page number.
pub struct BPlusTree {
    pager: Pager,
    root_page_num: PageNum,
}

impl BPlusTree {
    /// Opens the table stored in `pager`, creating an empty root leaf on
    /// page 0 for a fresh file.
    pub fn open(mut pager: Pager) -> Result<Self, DatabaseError> {
        if pager.num_pages() == 0 {
            let root = pager.get_page(0)?;
            root.initialize_leaf();
            root.set_root(true);
            info!("initialized empty table with root leaf on page 0");
            return Ok(Self {
                pager,
                root_page_num: 0,
            });
        }

        let root_page_num = Self::recover_root(&mut pager)?;
        info!(root_page_num, "recovered table root");
        Ok(Self {
            pager,
            root_page_num,
        })
    }

    fn recover_root(pager: &mut Pager) -> Result<PageNum, DatabaseError> {
        let mut roots = Vec::new();
        for page_num in 0..pager.num_pages() {
            let page = pager.get_page(page_num)?;
            page.node_type()?;
            if page.is_root() {
                roots.push(page_num);
            }
        }
        match roots.as_slice() {
            [root] => Ok(*root),
            [] => Err(DatabaseError::CorruptedFile {
                reason: "No page is marked as the root".to_string(),
            }),
            _ => Err(DatabaseError::CorruptedFile {
                reason: format!("Multiple pages are marked as the root: {:?}", roots),
            }),
        }
    }

    pub fn root_page_num(&self) -> PageNum {
        self.root_page_num
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Flushes every resident page and closes the backing file.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.pager.close()
    }

    /// Loads a page and checks that its header describes a well-formed node.
    pub fn node(&mut self, page_num: PageNum) -> Result<&Page, DatabaseError> {
        self.node_mut(page_num).map(|page| &*page)
    }

    fn node_mut(&mut self, page_num: PageNum) -> Result<&mut Page, DatabaseError> {
        if page_num >= self.pager.num_pages() {
            return Err(DatabaseError::CorruptedPage {
                page_num,
                reason: format!(
                    "Node reference past the end of the table ({} pages)",
                    self.pager.num_pages()
                ),
            });
        }
        let page = self.pager.get_page(page_num)?;
        let well_formed = match page.node_type() {
            Ok(NodeType::Leaf) => page.leaf_num_cells() as usize <= LEAF_NODE_MAX_CELLS,
            Ok(NodeType::Internal) => page.internal_num_keys() as usize <= INTERNAL_NODE_MAX_KEYS,
            Err(_) => false,
        };
        if !well_formed {
            return Err(DatabaseError::CorruptedPage {
                page_num,
                reason: "Malformed node header".to_string(),
            });
        }
        Ok(page)
    }

    /// Child `child_num` of an internal node; `num_keys` addresses the right child.
    pub fn child(&mut self, page_num: PageNum, child_num: usize) -> Result<PageNum, DatabaseError> {
        self.node(page_num)?
            .internal_child(child_num)
            .map_err(|e| DatabaseError::CorruptedPage {
                page_num,
                reason: e.to_string(),
            })
    }

    /// Largest key reachable from `page_num`, or `None` for an empty leaf.
    pub fn max_key(&mut self, page_num: PageNum) -> Result<Option<Key>, DatabaseError> {
        let mut current = page_num;
        loop {
            let node = self.node(current)?;
            match node.node_type()? {
                NodeType::Leaf => {
                    let num_cells = node.leaf_num_cells() as usize;
                    return Ok(num_cells.checked_sub(1).map(|last| node.leaf_key(last)));
                }
                NodeType::Internal => {
                    let num_keys = node.internal_num_keys() as usize;
                    current = self.child(current, num_keys)?;
                }
            }
        }
    }

    /// Descends from the root to the leaf that holds (or would hold) `key`,
    /// recording every internal node passed on the way.
    fn descend(&mut self, key: Key) -> Result<(Vec<PathEntry>, Cursor), DatabaseError> {
        let mut path = Vec::new();
        let mut page_num = self.root_page_num;
        loop {
            let node = self.node(page_num)?;
            match node.node_type()? {
                NodeType::Leaf => {
                    let cell_num = node.leaf_find(key) as u32;
                    let end_of_table = cell_num >= node.leaf_num_cells();
                    return Ok((
                        path,
                        Cursor {
                            page_num,
                            cell_num,
                            end_of_table,
                        },
                    ));
                }
                NodeType::Internal => {
                    let child_index = node.internal_find_child(key);
                    let child = self.child(page_num, child_index)?;
                    path.push(PathEntry {
                        page_num,
                        child_index,
                    });
                    if path.len() > self.pager.num_pages() as usize {
                        return Err(DatabaseError::CorruptedPage {
                            page_num,
                            reason: "Cycle detected while descending the tree".to_string(),
                        });
                    }
                    page_num = child;
                }
            }
        }
    }

    /// Position of `key`: the cell holding it, or the slot it would be inserted at.
    pub fn find(&mut self, key: Key) -> Result<Cursor, DatabaseError> {
        self.descend(key).map(|(_, cursor)| cursor)
    }

    /// Cursor at the first cell of the leftmost leaf.
    pub fn start(&mut self) -> Result<Cursor, DatabaseError> {
        self.find(Key::MIN)
    }

    pub fn get(&mut self, key: Key) -> Result<Option<Row>, DatabaseError> {
        let cursor = self.find(key)?;
        if cursor.end_of_table {
            return Ok(None);
        }
        let node = self.node(cursor.page_num)?;
        let cell_num = cursor.cell_num as usize;
        if node.leaf_key(cell_num) != key {
            return Ok(None);
        }
        Row::from_bytes(node.leaf_value(cell_num)).map(Some)
    }

    pub fn insert(&mut self, key: Key, row: &Row) -> Result<(), DatabaseError> {
        let mut value = [0u8; ROW_SIZE];
        row.serialize_into(&mut value)?;

        let (mut path, cursor) = self.descend(key)?;
        let cell_num = cursor.cell_num as usize;
        let leaf = self.node_mut(cursor.page_num)?;
        let num_cells = leaf.leaf_num_cells() as usize;

        if cell_num < num_cells && leaf.leaf_key(cell_num) == key {
            return Err(DatabaseError::DuplicateKey { key });
        }

        if num_cells < LEAF_NODE_MAX_CELLS {
            leaf.leaf_insert_cell(cell_num, key, &value);
            return Ok(());
        }

        let needed = self.pages_required_for_split(&path)?;
        let available = self.pager.max_pages() - self.pager.num_pages();
        if needed > available {
            debug!(key, needed, available, "insert rejected, table full");
            return Err(DatabaseError::TableFull { needed, available });
        }

        let mut split = self.split_leaf(cursor, key, &value)?;
        while let Some(entry) = path.pop() {
            match self.insert_into_internal(entry, split)? {
                Some(next) => split = next,
                None => return Ok(()),
            }
        }
        self.create_new_root(split)
    }

    /// Number of fresh pages a split starting at the leaf below `path` will
    /// allocate: one per full node on the way up, plus a new root when the
    /// split reaches the top.
    fn pages_required_for_split(&mut self, path: &[PathEntry]) -> Result<u32, DatabaseError> {
        let mut needed = 1;
        for entry in path.iter().rev() {
            let node = self.node(entry.page_num)?;
            if (node.internal_num_keys() as usize) < INTERNAL_NODE_MAX_KEYS {
                return Ok(needed);
            }
            needed += 1;
        }
        Ok(needed + 1)
    }

    fn split_leaf(
        &mut self,
        cursor: Cursor,
        key: Key,
        value: &[u8],
    ) -> Result<SplitResult, DatabaseError> {
        let old_page_num = cursor.page_num;
        let (mut cells, parent) = {
            let old = self.node(old_page_num)?;
            let cells: Vec<Vec<u8>> = (0..old.leaf_num_cells() as usize)
                .map(|i| old.leaf_cell(i).to_vec())
                .collect();
            (cells, old.parent())
        };

        let mut new_cell = Vec::with_capacity(LEAF_NODE_CELL_SIZE);
        new_cell.extend_from_slice(&key.to_le_bytes());
        new_cell.extend_from_slice(value);
        cells.insert(cursor.cell_num as usize, new_cell);

        let new_page_num = self.pager.unused_page_num();
        let right = self.pager.get_page(new_page_num)?;
        right.initialize_leaf();
        right.set_parent(parent);
        for (i, cell) in cells[LEAF_NODE_LEFT_SPLIT_COUNT..].iter().enumerate() {
            right.leaf_cell_mut(i).copy_from_slice(cell);
        }
        right.set_leaf_num_cells(LEAF_NODE_RIGHT_SPLIT_COUNT as u32);

        let left = self.node_mut(old_page_num)?;
        for (i, cell) in cells[..LEAF_NODE_LEFT_SPLIT_COUNT].iter().enumerate() {
            left.leaf_cell_mut(i).copy_from_slice(cell);
        }
        left.set_leaf_num_cells(LEAF_NODE_LEFT_SPLIT_COUNT as u32);
        let left_max = left.leaf_key(LEAF_NODE_LEFT_SPLIT_COUNT - 1);

        debug!(
            left = old_page_num,
            right = new_page_num,
            left_max,
            "split leaf node"
        );
        Ok(SplitResult {
            left_page: old_page_num,
            left_max,
            right_page: new_page_num,
        })
    }

    /// Hooks a split child into its parent. The parent's entry for the child is
    /// lowered to the child's new maximum and the new sibling takes over the
    /// old key (or the right-child slot). Returns the parent's own overflow
    /// record if it now holds too many keys.
    fn insert_into_internal(
        &mut self,
        entry: PathEntry,
        split: SplitResult,
    ) -> Result<Option<SplitResult>, DatabaseError> {
        let page_num = entry.page_num;
        let (mut entries, mut right_child, parent) = {
            let node = self.node(page_num)?;
            (node.internal_entries(), node.internal_right_child(), node.parent())
        };

        let index = entry.child_index;
        if index < entries.len() {
            let old_max = entries[index].1;
            entries[index] = (split.left_page, split.left_max);
            entries.insert(index + 1, (split.right_page, old_max));
        } else {
            entries.push((split.left_page, split.left_max));
            right_child = split.right_page;
        }
        self.node_mut(split.right_page)?.set_parent(page_num);

        if entries.len() <= INTERNAL_NODE_MAX_KEYS {
            self.node_mut(page_num)?
                .set_internal_entries(&entries, right_child);
            return Ok(None);
        }
        self.split_internal(page_num, parent, &entries, right_child)
            .map(Some)
    }

    fn split_internal(
        &mut self,
        page_num: PageNum,
        parent: PageNum,
        entries: &[(PageNum, Key)],
        right_child: PageNum,
    ) -> Result<SplitResult, DatabaseError> {
        // The left node keeps the larger half of the children when the count is odd.
        let left_children = (entries.len() + 2) / 2;
        let (left_right_child, left_max) = entries[left_children - 1];
        let left_entries = &entries[..left_children - 1];
        let right_entries = &entries[left_children..];

        let new_page_num = self.pager.unused_page_num();
        let right = self.pager.get_page(new_page_num)?;
        right.initialize_internal();
        right.set_parent(parent);
        right.set_internal_entries(right_entries, right_child);

        for &child in right_entries
            .iter()
            .map(|(child, _)| child)
            .chain(std::iter::once(&right_child))
        {
            self.node_mut(child)?.set_parent(new_page_num);
        }

        self.node_mut(page_num)?
            .set_internal_entries(left_entries, left_right_child);

        debug!(
            left = page_num,
            right = new_page_num,
            left_max,
            "split internal node"
        );
        Ok(SplitResult {
            left_page: page_num,
            left_max,
            right_page: new_page_num,
        })
    }

    fn create_new_root(&mut self, split: SplitResult) -> Result<(), DatabaseError> {
        let new_root_page_num = self.pager.unused_page_num();
        let root = self.pager.get_page(new_root_page_num)?;
        root.initialize_internal();
        root.set_root(true);
        root.set_internal_entries(&[(split.left_page, split.left_max)], split.right_page);

        let left = self.node_mut(split.left_page)?;
        left.set_root(false);
        left.set_parent(new_root_page_num);
        self.node_mut(split.right_page)?
            .set_parent(new_root_page_num);

        info!(
            old_root = self.root_page_num,
            new_root = new_root_page_num,
            "created new root"
        );
        self.root_page_num = new_root_page_num;
        Ok(())
    }
}

use crate::types::{
    COMMON_NODE_HEADER_SIZE, INTERNAL_NODE_CELL_SIZE, INTERNAL_NODE_CHILD_SIZE, INTERNAL_NODE_HEADER_SIZE,
    INTERNAL_NODE_MAX_KEYS, INTERNAL_NODE_NUM_KEYS_OFFSET, INTERNAL_NODE_RIGHT_CHILD_OFFSET,
    INVALID_PAGE_NUM, IS_ROOT_OFFSET, Key, LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE,
    LEAF_NODE_KEY_OFFSET, LEAF_NODE_MAX_CELLS, LEAF_NODE_NUM_CELLS_OFFSET, LEAF_NODE_VALUE_OFFSET,
    LEAF_NODE_VALUE_SIZE, NODE_TYPE_OFFSET, PAGE_SIZE, PARENT_POINTER_OFFSET, PageNum,
    error::DatabaseError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Internal = 0,
    Leaf = 1,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Result<Self, DatabaseError> {
        match value {
            0 => Ok(NodeType::Internal),
            1 => Ok(NodeType::Leaf),
            _ => Err(DatabaseError::InvalidNodeType(value)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            NodeType::Internal => 0,
            NodeType::Leaf => 1,
        }
    }
}

/*
 * Page Layout on Disk (one B-tree node per page)
 * ┌─────────────────────────────────────────────────────────────────┐
 * │ COMMON HEADER (6 bytes)                                         │
 * │  node_type(1) | is_root(1) | parent_page_num(4)                 │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ LEAF:     num_cells(4)                                          │
 * │           [key(4) | row(293)] x num_cells, ascending by key     │
 * │ INTERNAL: num_keys(4) | right_child(4)                          │
 * │           [child(4) | key(4)] x num_keys, ascending by key      │
 * └─────────────────────────────────────────────────────────────────┘
 */

/// A fixed-size page buffer with typed accessors for the node layouts.
///
/// The buffer is always exactly `PAGE_SIZE` bytes, so every header offset is
/// in bounds by construction. Cell indices are checked against the node's
/// capacity, which keeps every cell slice inside the page as well.
#[derive(Clone)]
pub struct Page {
    data: Box<[u8; PAGE_SIZE]>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Page");
        match self.node_type() {
            Ok(NodeType::Leaf) => s
                .field("node_type", &NodeType::Leaf)
                .field("num_cells", &self.leaf_num_cells()),
            Ok(NodeType::Internal) => s
                .field("node_type", &NodeType::Internal)
                .field("num_keys", &self.internal_num_keys())
                .field("right_child", &self.internal_right_child()),
            Err(_) => s.field("node_type", &self.data[NODE_TYPE_OFFSET]),
        };
        s.field("is_root", &self.is_root())
            .field("parent", &self.parent())
            .finish()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// A zero-filled page. Zero decodes as an empty, non-root internal node,
    /// so callers initialize it as a leaf or internal node before use.
    pub fn new() -> Self {
        Self {
            data: Box::new([0u8; PAGE_SIZE]),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatabaseError> {
        let data: Box<[u8; PAGE_SIZE]> = bytes
            .to_vec()
            .into_boxed_slice()
            .try_into()
            .map_err(|b: Box<[u8]>| DatabaseError::SerializationError {
                details: format!("Invalid page size: expected {}, got {}", PAGE_SIZE, b.len()),
            })?;
        Ok(Self { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }

    fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    fn write_u32(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    // Common header

    pub fn node_type(&self) -> Result<NodeType, DatabaseError> {
        NodeType::from_u8(self.data[NODE_TYPE_OFFSET])
    }

    pub fn set_node_type(&mut self, node_type: NodeType) {
        self.data[NODE_TYPE_OFFSET] = node_type.as_u8();
    }

    pub fn is_root(&self) -> bool {
        self.data[IS_ROOT_OFFSET] != 0
    }

    pub fn set_root(&mut self, is_root: bool) {
        self.data[IS_ROOT_OFFSET] = is_root as u8;
    }

    pub fn parent(&self) -> PageNum {
        self.read_u32(PARENT_POINTER_OFFSET)
    }

    pub fn set_parent(&mut self, parent: PageNum) {
        self.write_u32(PARENT_POINTER_OFFSET, parent);
    }

    // Leaf node

    pub fn initialize_leaf(&mut self) {
        self.data[COMMON_NODE_HEADER_SIZE..].fill(0);
        self.set_node_type(NodeType::Leaf);
        self.set_root(false);
        self.set_parent(INVALID_PAGE_NUM);
        self.set_leaf_num_cells(0);
    }

    pub fn leaf_num_cells(&self) -> u32 {
        self.read_u32(LEAF_NODE_NUM_CELLS_OFFSET)
    }

    pub fn set_leaf_num_cells(&mut self, num_cells: u32) {
        self.write_u32(LEAF_NODE_NUM_CELLS_OFFSET, num_cells);
    }

    fn leaf_cell_offset(cell_num: usize) -> usize {
        assert!(
            cell_num < LEAF_NODE_MAX_CELLS,
            "leaf cell {} out of range",
            cell_num
        );
        LEAF_NODE_HEADER_SIZE + cell_num * LEAF_NODE_CELL_SIZE
    }

    pub fn leaf_cell(&self, cell_num: usize) -> &[u8] {
        let offset = Self::leaf_cell_offset(cell_num);
        &self.data[offset..offset + LEAF_NODE_CELL_SIZE]
    }

    pub fn leaf_cell_mut(&mut self, cell_num: usize) -> &mut [u8] {
        let offset = Self::leaf_cell_offset(cell_num);
        &mut self.data[offset..offset + LEAF_NODE_CELL_SIZE]
    }

    pub fn leaf_key(&self, cell_num: usize) -> Key {
        self.read_u32(Self::leaf_cell_offset(cell_num) + LEAF_NODE_KEY_OFFSET)
    }

    pub fn set_leaf_key(&mut self, cell_num: usize, key: Key) {
        let offset = Self::leaf_cell_offset(cell_num) + LEAF_NODE_KEY_OFFSET;
        self.write_u32(offset, key);
    }

    pub fn leaf_value(&self, cell_num: usize) -> &[u8] {
        let offset = Self::leaf_cell_offset(cell_num) + LEAF_NODE_VALUE_OFFSET;
        &self.data[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    pub fn leaf_value_mut(&mut self, cell_num: usize) -> &mut [u8] {
        let offset = Self::leaf_cell_offset(cell_num) + LEAF_NODE_VALUE_OFFSET;
        &mut self.data[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    /// Writes a cell at `cell_num`, shifting the cells at and after it one slot
    /// to the right. The leaf must have a free slot.
    pub fn leaf_insert_cell(&mut self, cell_num: usize, key: Key, value: &[u8]) {
        let num_cells = self.leaf_num_cells() as usize;
        assert!(num_cells < LEAF_NODE_MAX_CELLS, "leaf node is full");
        assert!(cell_num <= num_cells, "cell {} past end of leaf", cell_num);

        if cell_num < num_cells {
            let start = Self::leaf_cell_offset(cell_num);
            let end = LEAF_NODE_HEADER_SIZE + num_cells * LEAF_NODE_CELL_SIZE;
            self.data.copy_within(start..end, start + LEAF_NODE_CELL_SIZE);
        }
        self.set_leaf_key(cell_num, key);
        self.leaf_value_mut(cell_num).copy_from_slice(value);
        self.set_leaf_num_cells(num_cells as u32 + 1);
    }

    /// Binary search over the stored keys. Returns the slot holding `key`, or
    /// the slot where it would be inserted.
    pub fn leaf_find(&self, key: Key) -> usize {
        let mut min_index = 0usize;
        let mut one_past_max_index = self.leaf_num_cells() as usize;
        while one_past_max_index != min_index {
            let index = (min_index + one_past_max_index) / 2;
            let key_at_index = self.leaf_key(index);
            if key == key_at_index {
                return index;
            }
            if key < key_at_index {
                one_past_max_index = index;
            } else {
                min_index = index + 1;
            }
        }
        min_index
    }

    // Internal node

    pub fn initialize_internal(&mut self) {
        self.data[COMMON_NODE_HEADER_SIZE..].fill(0);
        self.set_node_type(NodeType::Internal);
        self.set_root(false);
        self.set_parent(INVALID_PAGE_NUM);
        self.set_internal_num_keys(0);
        self.set_internal_right_child(INVALID_PAGE_NUM);
    }

    pub fn internal_num_keys(&self) -> u32 {
        self.read_u32(INTERNAL_NODE_NUM_KEYS_OFFSET)
    }

    pub fn set_internal_num_keys(&mut self, num_keys: u32) {
        self.write_u32(INTERNAL_NODE_NUM_KEYS_OFFSET, num_keys);
    }

    pub fn internal_right_child(&self) -> PageNum {
        self.read_u32(INTERNAL_NODE_RIGHT_CHILD_OFFSET)
    }

    pub fn set_internal_right_child(&mut self, page_num: PageNum) {
        self.write_u32(INTERNAL_NODE_RIGHT_CHILD_OFFSET, page_num);
    }

    fn internal_cell_offset(cell_num: usize) -> usize {
        assert!(
            cell_num < INTERNAL_NODE_MAX_KEYS,
            "internal cell {} out of range",
            cell_num
        );
        INTERNAL_NODE_HEADER_SIZE + cell_num * INTERNAL_NODE_CELL_SIZE
    }

    /// Child pointer `child_num`; `num_keys` addresses the right child.
    pub fn internal_child(&self, child_num: usize) -> Result<PageNum, DatabaseError> {
        let num_keys = self.internal_num_keys() as usize;
        let child = if child_num > num_keys {
            return Err(DatabaseError::CorruptedPage {
                page_num: INVALID_PAGE_NUM,
                reason: format!("child {} > num_keys {}", child_num, num_keys),
            });
        } else if child_num == num_keys {
            self.internal_right_child()
        } else {
            self.read_u32(Self::internal_cell_offset(child_num))
        };
        if child == INVALID_PAGE_NUM {
            return Err(DatabaseError::CorruptedPage {
                page_num: INVALID_PAGE_NUM,
                reason: format!("child {} is an invalid page", child_num),
            });
        }
        Ok(child)
    }

    pub fn set_internal_child(&mut self, cell_num: usize, page_num: PageNum) {
        let offset = Self::internal_cell_offset(cell_num);
        self.write_u32(offset, page_num);
    }

    pub fn internal_key(&self, key_num: usize) -> Key {
        self.read_u32(Self::internal_cell_offset(key_num) + INTERNAL_NODE_CHILD_SIZE)
    }

    pub fn set_internal_key(&mut self, key_num: usize, key: Key) {
        let offset = Self::internal_cell_offset(key_num) + INTERNAL_NODE_CHILD_SIZE;
        self.write_u32(offset, key);
    }

    /// Index of the child that should contain `key`: the first entry whose key
    /// is >= `key`, or `num_keys` (the right child) past the last entry.
    pub fn internal_find_child(&self, key: Key) -> usize {
        let mut min_index = 0usize;
        let mut max_index = self.internal_num_keys() as usize;
        while min_index != max_index {
            let index = (min_index + max_index) / 2;
            let key_to_right = self.internal_key(index);
            if key_to_right >= key {
                max_index = index;
            } else {
                min_index = index + 1;
            }
        }
        min_index
    }

    /// All `(child, key)` entries in stored order, excluding the right child.
    pub fn internal_entries(&self) -> Vec<(PageNum, Key)> {
        (0..self.internal_num_keys() as usize)
            .map(|i| (self.read_u32(Self::internal_cell_offset(i)), self.internal_key(i)))
            .collect()
    }

    /// Rewrites the entry area and right child in one go.
    pub fn set_internal_entries(&mut self, entries: &[(PageNum, Key)], right_child: PageNum) {
        assert!(
            entries.len() <= INTERNAL_NODE_MAX_KEYS,
            "{} entries exceed internal node capacity",
            entries.len()
        );
        for (i, &(child, key)) in entries.iter().enumerate() {
            self.set_internal_child(i, child);
            self.set_internal_key(i, key);
        }
        self.set_internal_num_keys(entries.len() as u32);
        self.set_internal_right_child(right_child);
    }
}

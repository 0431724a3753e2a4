use crate::types::PageNum;

/// A position inside a leaf: where a key lives, or where it would be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub page_num: PageNum,
    pub cell_num: u32,
    pub end_of_table: bool,
}

/// One step of a root-to-leaf descent: the internal page and the child index taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEntry {
    pub page_num: PageNum,
    pub child_index: usize,
}

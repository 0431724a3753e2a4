pub mod bplus_tree;
pub mod cursor;
pub mod pager;
pub mod storage_manager;

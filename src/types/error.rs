use thiserror::Error;

use crate::types::{Key, PageNum};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("String is too long ({field}: {actual} bytes, max {max})")]
    StringTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Duplicate key {key}")]
    DuplicateKey { key: Key },

    #[error("Table full: {needed} more page(s) required, {available} available")]
    TableFull { needed: u32, available: u32 },

    #[error("Tried to fetch page number out of bounds: {page_num} >= {max_pages}")]
    PageOutOfBounds { page_num: PageNum, max_pages: u32 },

    #[error("Corrupted database file: {reason}")]
    CorruptedFile { reason: String },

    #[error("Corrupted page: page_num={page_num}, reason={reason}")]
    CorruptedPage { page_num: PageNum, reason: String },

    #[error("Invalid node type: {0}")]
    InvalidNodeType(u8),

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },

    #[error("Invalid configuration: {details}")]
    InvalidConfig { details: String },
}

impl DatabaseError {
    /// Fatal errors leave the engine unable to continue; everything else is
    /// reported to the user and the session goes on.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DatabaseError::StringTooLong { .. }
                | DatabaseError::DuplicateKey { .. }
                | DatabaseError::TableFull { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

use std::fmt;

use crate::types::{
    COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE, EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, Key,
    ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE, error::DatabaseError,
};

/*
 * Row Layout on Disk (fixed width, 293 bytes)
 * ┌──────────┬──────────────────────────┬──────────────────────────────┐
 * │ id (4)   │ username (32 + 1 null)   │ email (255 + 1 null)         │
 * └──────────┴──────────────────────────┴──────────────────────────────┘
 * Unused trailing bytes of each string field are zero.
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Key,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: Key, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Checks the string columns against their fixed field widths.
    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.username.len() > COLUMN_USERNAME_SIZE {
            return Err(DatabaseError::StringTooLong {
                field: "username",
                max: COLUMN_USERNAME_SIZE,
                actual: self.username.len(),
            });
        }
        if self.email.len() > COLUMN_EMAIL_SIZE {
            return Err(DatabaseError::StringTooLong {
                field: "email",
                max: COLUMN_EMAIL_SIZE,
                actual: self.email.len(),
            });
        }
        Ok(())
    }

    /// Serialize into `destination`, which must hold at least `ROW_SIZE` bytes.
    /// Nothing is written when validation fails.
    pub fn serialize_into(&self, destination: &mut [u8]) -> Result<(), DatabaseError> {
        self.validate()?;
        if destination.len() < ROW_SIZE {
            return Err(DatabaseError::SerializationError {
                details: format!(
                    "Row buffer too small: expected {}, got {}",
                    ROW_SIZE,
                    destination.len()
                ),
            });
        }

        destination[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_fixed(
            &mut destination[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
            &self.username,
        );
        write_fixed(
            &mut destination[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE],
            &self.email,
        );
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<[u8; ROW_SIZE], DatabaseError> {
        let mut buffer = [0u8; ROW_SIZE];
        self.serialize_into(&mut buffer)?;
        Ok(buffer)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatabaseError> {
        if bytes.len() < ROW_SIZE {
            return Err(DatabaseError::SerializationError {
                details: format!("Incomplete row: expected {}, got {}", ROW_SIZE, bytes.len()),
            });
        }

        let id = Key::from_le_bytes([
            bytes[ID_OFFSET],
            bytes[ID_OFFSET + 1],
            bytes[ID_OFFSET + 2],
            bytes[ID_OFFSET + 3],
        ]);
        let username = read_fixed(&bytes[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE])?;
        let email = read_fixed(&bytes[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE])?;

        Ok(Row {
            id,
            username,
            email,
        })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn write_fixed(field: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    field[..bytes.len()].copy_from_slice(bytes);
    field[bytes.len()..].fill(0);
}

fn read_fixed(field: &[u8]) -> Result<String, DatabaseError> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8(field[..end].to_vec()).map_err(|e| DatabaseError::SerializationError {
        details: format!("Invalid UTF-8 in string column: {}", e),
    })
}

use celldb::types::{
    EMAIL_OFFSET, ROW_SIZE, USERNAME_OFFSET, error::DatabaseError, row::Row,
};

#[test]
fn test_row_round_trip() {
    let row = Row::new(1, "user1", "person1@example.com");
    let bytes = row.to_bytes().unwrap();
    assert_eq!(Row::from_bytes(&bytes).unwrap(), row);
}

#[test]
fn test_row_layout() {
    let row = Row::new(0x0102_0304, "ab", "c@d");
    let bytes = row.to_bytes().unwrap();
    assert_eq!(&bytes[..4], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&bytes[USERNAME_OFFSET..USERNAME_OFFSET + 3], b"ab\0");
    assert_eq!(&bytes[EMAIL_OFFSET..EMAIL_OFFSET + 4], b"c@d\0");
    assert_eq!(USERNAME_OFFSET, 4);
    assert_eq!(EMAIL_OFFSET, 37);
    assert_eq!(ROW_SIZE, 293);
}

#[test]
fn test_boundary_lengths() {
    assert!(Row::new(1, "u".repeat(32), "e".repeat(255)).to_bytes().is_ok());
    assert!(matches!(
        Row::new(1, "u".repeat(33), "e").to_bytes(),
        Err(DatabaseError::StringTooLong { field: "username", max: 32, actual: 33 })
    ));
    assert!(matches!(
        Row::new(1, "u", "e".repeat(256)).to_bytes(),
        Err(DatabaseError::StringTooLong { field: "email", max: 255, actual: 256 })
    ));
}

#[test]
fn test_length_is_measured_in_bytes() {
    // 11 three-byte characters
    let username = "日".repeat(11);
    assert!(Row::new(1, username, "e").validate().is_err());
}

#[test]
fn test_empty_strings() {
    let row = Row::new(7, "", "");
    assert_eq!(Row::from_bytes(&row.to_bytes().unwrap()).unwrap(), row);
    assert_eq!(row.to_string(), "(7, , )");
}

#[test]
fn test_from_bytes_rejects_short_buffer() {
    assert!(matches!(
        Row::from_bytes(&[0u8; ROW_SIZE - 1]),
        Err(DatabaseError::SerializationError { .. })
    ));
}

#[test]
fn test_from_bytes_rejects_invalid_utf8() {
    let mut bytes = Row::new(1, "a", "b").to_bytes().unwrap();
    bytes[USERNAME_OFFSET] = 0xFF;
    assert!(Row::from_bytes(&bytes).is_err());
}

#[test]
fn test_display() {
    let row = Row::new(1, "user1", "person1@example.com");
    assert_eq!(row.to_string(), "(1, user1, person1@example.com)");
}

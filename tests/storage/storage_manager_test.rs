use celldb::{
    storage::storage_manager::StorageManager,
    types::{PAGE_SIZE, error::DatabaseError, row::Row},
    utils::mock::TempDatabase,
};

fn user_row(id: u32) -> Row {
    Row::new(id, format!("user{}", id), format!("person{}@example.com", id))
}

#[test]
fn test_new_database_info() {
    let db = TempDatabase::new().unwrap();
    let storage = db.create_storage_manager().unwrap();
    let info = storage.db_info();
    assert_eq!(info.path, db.path());
    assert_eq!(info.page_count, 1);
    assert_eq!(info.max_pages, 100);
    assert_eq!(info.root_page_num, 0);
    // nothing is written until close
    assert_eq!(info.file_size, 0);
}

#[test]
fn test_open_existing_database() {
    let db = TempDatabase::new().unwrap();
    {
        let mut storage = db.create_storage_manager().unwrap();
        storage.insert_row(&user_row(1)).unwrap();
        storage.close().unwrap();
    }
    let mut storage = db.create_storage_manager().unwrap();
    assert_eq!(storage.db_info().file_size, PAGE_SIZE as u64);
    assert_eq!(storage.get_row(1).unwrap(), Some(user_row(1)));
}

#[test]
fn test_changes_without_close_are_lost() {
    let db = TempDatabase::new().unwrap();
    {
        let mut storage = db.create_storage_manager().unwrap();
        storage.insert_row(&user_row(1)).unwrap();
        storage.close().unwrap();
    }
    {
        let mut storage = db.create_storage_manager().unwrap();
        storage.insert_row(&user_row(2)).unwrap();
        drop(storage);
    }
    let mut storage = db.create_storage_manager().unwrap();
    assert_eq!(storage.scan_table().unwrap(), vec![user_row(1)]);
}

#[test]
fn test_insert_and_scan_in_key_order() {
    let db = TempDatabase::new().unwrap();
    let mut storage = db.create_storage_manager().unwrap();
    for id in [5, 3, 9, 1] {
        storage.insert_row(&user_row(id)).unwrap();
    }
    let ids: Vec<u32> = storage.scan_table().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3, 5, 9]);
}

#[test]
fn test_insert_batch_reports_count() {
    let db = TempDatabase::new().unwrap();
    let mut storage = db.create_storage_manager().unwrap();
    let rows = (1..=40).map(user_row).collect();
    assert_eq!(storage.insert_batch(rows).unwrap(), 40);
    assert_eq!(storage.scan_table().unwrap().len(), 40);
    assert_ne!(storage.db_info().root_page_num, 0);
}

#[test]
fn test_insert_batch_stops_at_first_failure() {
    let db = TempDatabase::new().unwrap();
    let mut storage = db.create_storage_manager().unwrap();
    let rows = vec![user_row(1), user_row(2), user_row(1), user_row(3)];
    assert!(matches!(
        storage.insert_batch(rows),
        Err(DatabaseError::DuplicateKey { key: 1 })
    ));
    let ids: Vec<u32> = storage.scan_table().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_config_max_pages_is_applied() {
    let db = TempDatabase::with_max_pages(1).unwrap();
    let mut storage = db.create_storage_manager().unwrap();
    for id in 1..=13 {
        storage.insert_row(&user_row(id)).unwrap();
    }
    assert!(matches!(
        storage.insert_row(&user_row(14)),
        Err(DatabaseError::TableFull { .. })
    ));
    assert_eq!(storage.db_info().max_pages, 1);
}

#[test]
fn test_zero_page_ceiling_rejected() {
    let db = TempDatabase::with_max_pages(0).unwrap();
    assert!(matches!(
        db.create_storage_manager(),
        Err(DatabaseError::InvalidConfig { .. })
    ));
}

#[test]
fn test_new_uses_default_ceiling() {
    let db = TempDatabase::new().unwrap();
    let storage = StorageManager::new(db.path()).unwrap();
    assert_eq!(storage.db_info().max_pages, 100);
}

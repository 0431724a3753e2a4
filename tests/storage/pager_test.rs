use celldb::{
    storage::pager::Pager,
    types::{PAGE_SIZE, error::DatabaseError},
    utils::mock::TempDatabase,
};

#[test]
fn test_open_creates_missing_file() {
    let db = TempDatabase::new().unwrap();
    assert!(!db.path().exists());
    let pager = Pager::open(db.path(), 10).unwrap();
    assert!(db.path().exists());
    assert_eq!(pager.file_length(), 0);
}

#[test]
fn test_file_grows_by_whole_pages_on_close() {
    let db = TempDatabase::new().unwrap();
    let mut pager = Pager::open(db.path(), 10).unwrap();
    for page_num in 0..4 {
        pager.get_page(page_num).unwrap().as_bytes_mut()[7] = page_num as u8 + 1;
    }
    pager.close().unwrap();

    let len = std::fs::metadata(db.path()).unwrap().len();
    assert_eq!(len, 4 * PAGE_SIZE as u64);

    let mut pager = Pager::open(db.path(), 10).unwrap();
    assert_eq!(pager.num_pages(), 4);
    for page_num in 0..4 {
        assert_eq!(pager.get_page(page_num).unwrap().as_bytes()[7], page_num as u8 + 1);
    }
}

#[test]
fn test_untouched_pages_survive_close() {
    let db = TempDatabase::new().unwrap();
    {
        let mut pager = Pager::open(db.path(), 10).unwrap();
        pager.get_page(0).unwrap().as_bytes_mut()[0] = 1;
        pager.get_page(1).unwrap().as_bytes_mut()[0] = 2;
        pager.close().unwrap();
    }
    {
        // only page 1 is loaded this time
        let mut pager = Pager::open(db.path(), 10).unwrap();
        pager.get_page(1).unwrap().as_bytes_mut()[1] = 3;
        pager.close().unwrap();
    }
    let mut pager = Pager::open(db.path(), 10).unwrap();
    assert_eq!(pager.get_page(0).unwrap().as_bytes()[0], 1);
    assert_eq!(&pager.get_page(1).unwrap().as_bytes()[..2], &[2, 3]);
}

#[test]
fn test_open_rejects_file_over_ceiling() {
    let db = TempDatabase::new().unwrap();
    std::fs::write(db.path(), vec![0u8; 3 * PAGE_SIZE]).unwrap();
    assert!(matches!(
        Pager::open(db.path(), 2),
        Err(DatabaseError::CorruptedFile { .. })
    ));
}

#[test]
fn test_page_out_of_bounds_is_fatal() {
    let db = TempDatabase::new().unwrap();
    let mut pager = Pager::open(db.path(), 2).unwrap();
    let err = pager.get_page(2).unwrap_err();
    assert!(matches!(err, DatabaseError::PageOutOfBounds { .. }));
    assert!(err.is_fatal());
}

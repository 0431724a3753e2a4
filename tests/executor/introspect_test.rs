use celldb::{
    executor::{ExecuteOutcome, Executor},
    utils::mock::TempDatabase,
};

fn run(executor: &mut Executor, input: &str) -> Vec<String> {
    match executor.execute_line(input).unwrap() {
        ExecuteOutcome::Output(lines) => lines,
        ExecuteOutcome::Exit => panic!("unexpected exit for {:?}", input),
    }
}

fn insert(executor: &mut Executor, id: u32) {
    let output = run(
        executor,
        &format!("insert {} user{} person{}@example.com", id, id, id),
    );
    assert_eq!(output, vec!["Executed."]);
}

#[test]
fn test_constants() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    assert_eq!(
        run(&mut executor, ".constants"),
        vec![
            "Constants:",
            "ROW_SIZE: 293",
            "COMMON_NODE_HEADER_SIZE: 6",
            "LEAF_NODE_HEADER_SIZE: 10",
            "LEAF_NODE_CELL_SIZE: 297",
            "LEAF_NODE_SPACE_FOR_CELLS: 4086",
            "LEAF_NODE_MAX_CELLS: 13",
        ]
    );
}

#[test]
fn test_btree_single_leaf() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    for id in [3, 1, 2] {
        insert(&mut executor, id);
    }
    assert_eq!(
        run(&mut executor, ".btree"),
        vec!["Tree:", "- leaf (size 3)", "  - 1", "  - 2", "  - 3"]
    );
}

#[test]
fn test_btree_empty() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    assert_eq!(run(&mut executor, ".btree"), vec!["Tree:", "- leaf (size 0)"]);
}

#[test]
fn test_btree_after_root_split() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    for id in 1..=14 {
        insert(&mut executor, id);
    }

    let mut expected = vec![
        "Tree:".to_string(),
        "- internal (size 1)".to_string(),
        "  - leaf (size 7)".to_string(),
    ];
    expected.extend((1..=7).map(|k| format!("    - {}", k)));
    expected.push("  - key 7".to_string());
    expected.push("  - leaf (size 7)".to_string());
    expected.extend((8..=14).map(|k| format!("    - {}", k)));

    assert_eq!(run(&mut executor, ".btree"), expected);
}

#[test]
fn test_btree_four_leaves() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    let ids = [
        18, 7, 10, 29, 23, 4, 14, 30, 15, 26, 22, 19, 2, 1, 21, 11, 6, 20, 5, 8, 9, 3, 12, 27,
        17, 16, 13, 24, 25, 28,
    ];
    for id in ids {
        insert(&mut executor, id);
    }

    let mut expected = vec!["Tree:".to_string(), "- internal (size 3)".to_string()];
    for (range, key) in [(1..=7, Some(7)), (8..=15, Some(15)), (16..=22, Some(22)), (23..=30, None)] {
        expected.push(format!("  - leaf (size {})", range.clone().count()));
        expected.extend(range.map(|k| format!("    - {}", k)));
        if let Some(key) = key {
            expected.push(format!("  - key {}", key));
        }
    }

    assert_eq!(run(&mut executor, ".btree"), expected);
}

#[test]
fn test_btree_internal_split() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    // Five leaves: the root overflows its three keys and splits.
    for id in 1..=35 {
        insert(&mut executor, id);
    }

    let lines = run(&mut executor, ".btree");
    assert_eq!(lines[1], "- internal (size 1)");
    assert_eq!(lines[2], "  - internal (size 2)");
    assert_eq!(lines.iter().filter(|l| l.contains("- leaf")).count(), 5);
    assert_eq!(lines.iter().filter(|l| l.ends_with("- key 21")).count(), 1);
}

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

fn run_script(executor: &mut Executor, inputs: &[&str]) -> Vec<String> {
    inputs.iter().flat_map(|input| run(executor, input)).collect()
}

#[test]
fn test_insert_then_select() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    let output = run_script(
        &mut executor,
        &["insert 1 user1 person1@example.com", "select"],
    );
    assert_eq!(
        output,
        vec!["Executed.", "(1, user1, person1@example.com)", "Executed."]
    );
}

#[test]
fn test_select_on_empty_table() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    assert_eq!(run(&mut executor, "select"), vec!["Executed."]);
}

#[test]
fn test_select_returns_rows_in_id_order() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    run_script(
        &mut executor,
        &["insert 3 c c@x.com", "insert 1 a a@x.com", "insert 2 b b@x.com"],
    );
    assert_eq!(
        run(&mut executor, "select"),
        vec!["(1, a, a@x.com)", "(2, b, b@x.com)", "(3, c, c@x.com)", "Executed."]
    );
}

#[test]
fn test_maximum_length_strings_accepted() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    let username = "a".repeat(32);
    let email = "a".repeat(255);
    let insert = format!("insert 1 {} {}", username, email);
    assert_eq!(run(&mut executor, &insert), vec!["Executed."]);
    assert_eq!(
        run(&mut executor, "select"),
        vec![format!("(1, {}, {})", username, email), "Executed.".to_string()]
    );
}

#[test]
fn test_overlong_strings_rejected() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    let long_username = format!("insert 1 {} a@x.com", "a".repeat(33));
    let long_email = format!("insert 1 user1 {}", "a".repeat(256));
    assert_eq!(run(&mut executor, &long_username), vec!["String is too long."]);
    assert_eq!(run(&mut executor, &long_email), vec!["String is too long."]);
    assert_eq!(run(&mut executor, "select"), vec!["Executed."]);
}

#[test]
fn test_negative_id_rejected() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    assert_eq!(
        run(&mut executor, "insert -1 cstack foo@bar.com"),
        vec!["ID must be positive."]
    );
    assert_eq!(run(&mut executor, "select"), vec!["Executed."]);
}

#[test]
fn test_duplicate_id_rejected() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    let output = run_script(
        &mut executor,
        &[
            "insert 1 user1 person1@example.com",
            "insert 1 user1 person1@example.com",
            "select",
        ],
    );
    assert_eq!(
        output,
        vec![
            "Executed.",
            "Error: Duplicate key.",
            "(1, user1, person1@example.com)",
            "Executed.",
        ]
    );
}

#[test]
fn test_parse_errors_are_reported() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    assert_eq!(
        run(&mut executor, "delete 1"),
        vec!["Unrecognized keyword at start of 'delete 1'."]
    );
    assert_eq!(
        run(&mut executor, ".tables"),
        vec!["Unrecognized command '.tables'."]
    );
    assert_eq!(
        run(&mut executor, "insert 1 onlyname"),
        vec!["Syntax error. Could not parse statement."]
    );
}

#[test]
fn test_trailing_newline_is_ignored() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    assert_eq!(run(&mut executor, "select\n"), vec!["Executed."]);
    assert_eq!(executor.execute_line(".exit\r\n").unwrap(), ExecuteOutcome::Exit);
}

#[test]
fn test_exit_command() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    assert_eq!(executor.execute_line(".exit").unwrap(), ExecuteOutcome::Exit);
}

#[test]
fn test_rows_persist_after_close() {
    let db = TempDatabase::new().unwrap();
    {
        let mut executor = db.create_executor().unwrap();
        run(&mut executor, "insert 1 user1 person1@example.com");
        executor.close().unwrap();
    }
    let mut executor = db.create_executor().unwrap();
    assert_eq!(
        run(&mut executor, "select"),
        vec!["(1, user1, person1@example.com)", "Executed."]
    );
}

#[test]
fn test_table_full_message() {
    let db = TempDatabase::new().unwrap();
    let mut executor = db.create_executor().unwrap();
    let last = (1..=1401)
        .map(|id| {
            run(
                &mut executor,
                &format!("insert {} user{} person{}@example.com", id, id, id),
            )
        })
        .last()
        .unwrap();
    assert_eq!(last, vec!["Error: Table full."]);

    let rows = run(&mut executor, "select");
    let row_count = rows.len() - 1;
    assert!(row_count > 13 && row_count < 1401);
    assert_eq!(rows[0], "(1, user1, person1@example.com)");
    assert_eq!(
        rows[row_count - 1],
        format!("({0}, user{0}, person{0}@example.com)", row_count)
    );
    assert_eq!(rows[row_count], "Executed.");
}

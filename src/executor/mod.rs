pub mod insert;
pub mod introspect;
pub mod scan;
pub mod sequential_scan;

use tracing::{debug, warn};

use crate::{
    config::Config,
    executor::{
        insert::{Inserter, TableInserter},
        scan::ScanIterator,
    },
    planner::{
        parser::CommandParser,
        types::{Command, MetaCommand, Statement},
    },
    storage::storage_manager::StorageManager,
    types::{error::DatabaseError, row::Row},
};

/// What the front end should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Lines to print, in order.
    Output(Vec<String>),
    Exit,
}

impl ExecuteOutcome {
    fn line(line: impl Into<String>) -> Self {
        ExecuteOutcome::Output(vec![line.into()])
    }
}

pub struct Executor {
    storage: StorageManager,
    parser: CommandParser,
}

impl Executor {
    pub fn new(storage: StorageManager) -> Self {
        Self {
            storage,
            parser: CommandParser::new(),
        }
    }

    pub fn open(config: &Config) -> Result<Self, DatabaseError> {
        StorageManager::with_config(config).map(Self::new)
    }

    pub fn storage(&mut self) -> &mut StorageManager {
        &mut self.storage
    }

    /// Parses and runs one input line. Parse failures and recoverable engine
    /// errors come back as output lines; only fatal errors are returned as `Err`.
    pub fn execute_line(&mut self, input: &str) -> Result<ExecuteOutcome, DatabaseError> {
        let input = input.trim_end_matches(['\n', '\r']);
        match self.parser.parse(input) {
            Ok(command) => self.execute(command),
            Err(e) => {
                debug!(input, error = %e, "could not parse input");
                Ok(ExecuteOutcome::line(e.to_string()))
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<ExecuteOutcome, DatabaseError> {
        match command {
            Command::Meta(MetaCommand::Exit) => Ok(ExecuteOutcome::Exit),
            Command::Meta(MetaCommand::Constants) => {
                Ok(ExecuteOutcome::Output(introspect::constants()))
            }
            Command::Meta(MetaCommand::BTree) => {
                introspect::render_tree(self.storage.tree()).map(ExecuteOutcome::Output)
            }
            Command::Statement(statement) => {
                self.execute_statement(statement).map(ExecuteOutcome::Output)
            }
        }
    }

    pub fn execute_statement(&mut self, statement: Statement) -> Result<Vec<String>, DatabaseError> {
        match statement {
            Statement::Insert(row) => self.execute_insert(row).map(|line| vec![line]),
            Statement::Select => self.execute_select(),
        }
    }

    pub fn execute_insert(&mut self, row: Row) -> Result<String, DatabaseError> {
        let id = row.id;
        let mut inserter = TableInserter::new(self.storage.tree());
        match inserter.insert(row) {
            Ok(()) => Ok("Executed.".to_string()),
            Err(DatabaseError::StringTooLong { field, .. }) => {
                debug!(id, field, "rejected row with oversized field");
                Ok("String is too long.".to_string())
            }
            Err(DatabaseError::DuplicateKey { key }) => {
                debug!(key, "rejected duplicate key");
                Ok("Error: Duplicate key.".to_string())
            }
            Err(DatabaseError::TableFull { needed, available }) => {
                warn!(id, needed, available, "table is full");
                Ok("Error: Table full.".to_string())
            }
            Err(e) => Err(e),
        }
    }

    pub fn execute_select(&mut self) -> Result<Vec<String>, DatabaseError> {
        let scanner = self.storage.create_scanner();
        let mut lines = ScanIterator::new(scanner)
            .map(|row| row.map(|row| row.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        lines.push("Executed.".to_string());
        Ok(lines)
    }

    /// Flushes the table to disk.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.storage.close()
    }
}

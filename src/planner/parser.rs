use crate::{
    planner::{
        error::PlannerError,
        types::{Command, MetaCommand, Statement},
    },
    types::{Key, row::Row},
};

/// Tokenizes a single REPL line into a [`Command`].
///
/// Lines starting with `.` are meta-commands. Everything else is a statement:
/// `insert <id> <username> <email>` or `select`. String lengths are not
/// checked here; that happens when the row is executed.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, input: &str) -> Result<Command, PlannerError> {
        if input.starts_with('.') {
            return self.parse_meta(input).map(Command::Meta);
        }
        self.parse_statement(input).map(Command::Statement)
    }

    fn parse_meta(&self, input: &str) -> Result<MetaCommand, PlannerError> {
        match input {
            ".exit" => Ok(MetaCommand::Exit),
            ".constants" => Ok(MetaCommand::Constants),
            ".btree" => Ok(MetaCommand::BTree),
            _ => Err(PlannerError::UnrecognizedCommand(input.to_string())),
        }
    }

    fn parse_statement(&self, input: &str) -> Result<Statement, PlannerError> {
        if input.starts_with("insert") {
            return self.parse_insert(input);
        }
        if input == "select" {
            return Ok(Statement::Select);
        }
        Err(PlannerError::UnrecognizedStatement(input.to_string()))
    }

    fn parse_insert(&self, input: &str) -> Result<Statement, PlannerError> {
        // Tokens after the email are ignored.
        let mut tokens = input.split_whitespace().skip(1);
        let (Some(id), Some(username), Some(email)) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(PlannerError::SyntaxError);
        };

        let id: i64 = id.parse().map_err(|_| PlannerError::SyntaxError)?;
        if id < 0 {
            return Err(PlannerError::NegativeId);
        }
        let id = Key::try_from(id).map_err(|_| PlannerError::SyntaxError)?;

        Ok(Statement::Insert(Row::new(id, username, email)))
    }
}

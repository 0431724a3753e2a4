use crate::types::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Constants,
    BTree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Meta(MetaCommand),
    Statement(Statement),
}

impl From<MetaCommand> for Command {
    fn from(meta: MetaCommand) -> Self {
        Command::Meta(meta)
    }
}

impl From<Statement> for Command {
    fn from(statement: Statement) -> Self {
        Command::Statement(statement)
    }
}

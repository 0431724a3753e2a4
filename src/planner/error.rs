/// Failures while turning an input line into a command. Each one is reported
/// to the user verbatim and the session continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("Unrecognized keyword at start of '{0}'.")]
    UnrecognizedStatement(String),
    #[error("Unrecognized command '{0}'.")]
    UnrecognizedCommand(String),
    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,
    #[error("ID must be positive.")]
    NegativeId,
}

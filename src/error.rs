//! Error types for the sheetrow command line

use thiserror::Error;

/// Problems with how the command line was written.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("No command given")]
    MissingCommand,

    #[error("Expected KEY=VALUE, got {0:?}")]
    InvalidAssignment(String),

    #[error("Unknown format {0:?} (expected markdown or csv)")]
    UnknownFormat(String),

    #[error("{command} needs at least one --set KEY=VALUE")]
    NothingToSet { command: &'static str },

    #[error("delete needs --where KEY=VALUE or --all")]
    UnboundedDelete,

    #[error("No workbook directory given (use --workbook or set `workbook` in the config)")]
    MissingWorkbook,

    #[error("No sheet given (use --sheet or set `sheet` in the config)")]
    MissingSheet,
}

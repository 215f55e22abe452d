//! Error types for qcrud

use std::time::Duration;

use thiserror::Error;

use crate::{dialect::Dialect, statement::StatementKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Input a statement cannot be built from. These are caller bugs, retrying
/// will not help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("no fields to write")]
    EmptyFields,

    #[error("delete requires at least one condition, use truncate to clear a table")]
    MissingCondition,

    #[error("table name is empty")]
    EmptyTable,

    #[error("no tables to truncate")]
    NoTables,

    #[error("statement has {placeholders} placeholders but {binds} binds")]
    PlaceholderMismatch { placeholders: usize, binds: usize },

    #[error("{0} does not support a limit on update or delete")]
    LimitUnsupported(Dialect),

    #[error("statement was built for {found}, the connection expects {expected}")]
    DialectMismatch { expected: Dialect, found: Dialect },

    #[error("{kind} statement cannot be read as {expected}")]
    KindMismatch {
        kind: StatementKind,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The connection could not be opened.
    #[cfg(feature = "mysql")]
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Anything the driver reports while running a statement: lost
    /// connection, syntax error, constraint violation.
    #[cfg(feature = "mysql")]
    #[error("query error: {0}")]
    Driver(#[from] sqlx::Error),

    #[error("could not encode bind {index}: {message}")]
    Encode { index: usize, message: String },

    #[error("could not decode column '{column}': {message}")]
    Decode { column: String, message: String },

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid value {value:?} for setting '{key}'")]
    InvalidSetting { key: String, value: String },
}

impl Error {
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    #[cfg(feature = "mysql")]
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_) | Self::Connection(_))
    }

    pub fn as_invalid_input(&self) -> Option<&InvalidInput> {
        match self {
            Self::InvalidInput(invalid) => Some(invalid),
            _ => None,
        }
    }
}

use crate::data::datatable::DataType;
use thiserror::Error;

/// Errors reported by mutating operations on a table.
///
/// A failed operation never applies partially: the table is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("a column named '{0}' already exists")]
    DuplicateName(String),

    #[error("the last remaining column cannot be deleted")]
    LastColumn,

    #[error("the last remaining row cannot be deleted")]
    LastRow,

    #[error("index {index} is out of bounds (length {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("row has {found} values but the table has {expected} columns")]
    ArityMismatch { expected: usize, found: usize },

    #[error("column {column} holds '{expected}' values, got a '{found}' value")]
    TypeMismatch {
        column: usize,
        expected: DataType,
        found: DataType,
    },
}

/// Errors reported when reading a JDF file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not a JDF file (first line is not 'JDF1')")]
    BadMagic,

    #[error("malformed JDF payload: {0}")]
    BadPayload(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LoadError {
    pub fn bad_payload(reason: impl Into<String>) -> Self {
        LoadError::BadPayload(reason.into())
    }
}

//! Error types for stockgrid

use thiserror::Error;

use crate::ColumnType;

/// Core error type for grid operations
///
/// Every variant is a local validation failure. None of them leave the
/// grid in a partially updated state.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Operator '{operator}' is not valid for {column_type} column '{column}'")]
    InvalidOperator {
        column: String,
        operator: String,
        column_type: ColumnType,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column is not filterable: {0}")]
    NotFilterable(String),

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    #[error("No filter editor is open")]
    EditorNotOpen,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No saved-filter store is configured for this grid")]
    StorageUnavailable,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GridError {
    /// Wrap a storage backend failure
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

/// Result type alias for grid operations
pub type Result<T> = std::result::Result<T, GridError>;

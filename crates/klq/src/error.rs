//! Error types for query execution and table loading.

use std::fmt;

use serde::Serialize;

/// Which side of a numeric comparison failed to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The row's field value.
    Field,
    /// The literal on the right of the operator.
    Literal,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field => f.write_str("value"),
            Operand::Literal => f.write_str("literal"),
        }
    }
}

/// Errors a query can fail with. The first one aborts the whole pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Unknown table \"{name}\". Available: {}", .available.join(", "))]
    UnknownTable {
        name: String,
        available: Vec<String>,
    },

    #[error("Unknown operation: \"{0}\"")]
    UnknownOperation(String),

    #[error("Invalid where clause: \"{0}\". Expected: field op value")]
    InvalidWhereClause(String),

    #[error("Invalid summarize: \"{0}\". Expected: count() by field")]
    InvalidSummarizeClause(String),

    #[error("Invalid take/limit value: {0}")]
    InvalidTakeArgument(String),

    /// Only raised under [`NumericCoercion::Strict`](crate::NumericCoercion::Strict).
    #[error("Cannot compare \"{field}\" numerically: {operand} \"{text}\" is not a number")]
    NonNumericOperand {
        field: String,
        operand: Operand,
        text: String,
    },
}

/// Stable classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    UnknownTable,
    UnknownOperation,
    InvalidWhereClause,
    InvalidSummarizeClause,
    InvalidTakeArgument,
    NonNumericOperand,
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::UnknownTable { .. } => ErrorKind::UnknownTable,
            QueryError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            QueryError::InvalidWhereClause(_) => ErrorKind::InvalidWhereClause,
            QueryError::InvalidSummarizeClause(_) => ErrorKind::InvalidSummarizeClause,
            QueryError::InvalidTakeArgument(_) => ErrorKind::InvalidTakeArgument,
            QueryError::NonNumericOperand { .. } => ErrorKind::NonNumericOperand,
        }
    }
}

/// Errors building a [`TableRegistry`](crate::TableRegistry) from JSON.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Table \"{0}\" must be a JSON array of objects")]
    NotATable(String),

    #[error("Row {index} of table \"{table}\" is not a JSON object")]
    NotARow { table: String, index: usize },

    #[error("Expected a JSON object mapping table names to rows in {0}")]
    NotATableSet(String),

    #[error("Duplicate table name: {0}")]
    DuplicateTable(String),
}

/// Convenience result type.
pub type KlqResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_table_lists_names() {
        let err = QueryError::UnknownTable {
            name: "foo".to_string(),
            available: vec!["devices".to_string(), "techniques".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown table \"foo\". Available: devices, techniques"
        );
        assert_eq!(err.kind(), ErrorKind::UnknownTable);
    }

    #[test]
    fn test_non_numeric_message() {
        let err = QueryError::NonNumericOperand {
            field: "channels".to_string(),
            operand: Operand::Field,
            text: "n/a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot compare \"channels\" numerically: value \"n/a\" is not a number"
        );
    }
}

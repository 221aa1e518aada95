//! Error handling for the sample matcher.

use std::io;

/// Specialized error type for sample matching operations
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing tabular data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A range condition referenced a case value or tolerance that is not numeric
    #[error("'{value}' in column '{column}' is not a valid number")]
    InvalidNumber {
        /// Column the value came from
        column: String,
        /// The offending raw value
        value: String,
    },

    /// A control cell could not be parsed as numeric under an active range condition
    #[error("column '{column}' contains '{value}' which cannot be converted to a numerical value")]
    ColumnType {
        /// Column assumed numeric by a range condition
        column: String,
        /// The offending raw value
        value: String,
    },

    /// A condition or query referenced a column missing from the metadata
    #[error("column '{0}' not found in the metadata")]
    ColumnNotFound(String),

    /// A match-condition line could not be parsed
    #[error("invalid match condition: {0}")]
    InvalidCondition(String),

    /// A query predicate line could not be parsed
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Input data violated a contract at the matching boundary
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal bookkeeping inconsistency inside the matcher
    #[error("lookup fault: {0}")]
    LookupFault(String),
}

/// Result type for sample matching operations
pub type Result<T> = std::result::Result<T, MatchError>;

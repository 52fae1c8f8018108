//! Core error types for the stock index repository.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// The single failure kind surfaced by the repository.
///
/// Every variant carries a human-readable message naming the aggregate (or id)
/// involved, and wraps the underlying cause where one exists.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database connection failure: {0}")]
    Connection(#[source] DatabaseError),

    #[error("Error when adding index {index} to repository: {source}")]
    Add {
        index: String,
        #[source]
        source: DatabaseError,
    },

    #[error("Error when adding index quote {quote} to index {index}: {source}")]
    AddQuote {
        quote: String,
        index: String,
        #[source]
        source: DatabaseError,
    },

    #[error("Stock index {0} not found")]
    NotFound(i64),

    #[error("Error when deleting the index {id}: {source}")]
    Delete {
        id: i64,
        #[source]
        source: DatabaseError,
    },

    #[error("Error when getting the stock index by id: {id}: {source}")]
    Get {
        id: i64,
        #[source]
        source: DatabaseError,
    },

    #[error("Error updating the index {index}: {source}")]
    Update {
        index: String,
        #[source]
        source: Box<RepositoryError>,
    },

    #[error("Failed to close the transaction: {0}")]
    Close(#[source] DatabaseError),
}

impl RepositoryError {
    /// Returns true when the error reports an id that is not in the store.
    pub fn is_not_found(&self) -> bool {
        match self {
            RepositoryError::NotFound(_) => true,
            RepositoryError::Update { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A value cannot be stored or read back as its domain type.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_detected_through_update() {
        let err = RepositoryError::Update {
            index: "{StockIndex: {id: 7}}".to_string(),
            source: Box::new(RepositoryError::NotFound(7)),
        };
        assert!(err.is_not_found());
        assert!(!RepositoryError::Close(DatabaseError::Internal("x".into())).is_not_found());
    }

    #[test]
    fn test_messages_name_the_aggregate() {
        let err = RepositoryError::AddQuote {
            quote: "{StockIndexQuote: {value: 1.000000, value_date: 2016-01-04}}".to_string(),
            index: "WIG20".to_string(),
            source: DatabaseError::UniqueViolation("UNIQUE constraint failed".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("2016-01-04"));
        assert!(message.contains("WIG20"));
        assert!(message.contains("UNIQUE constraint failed"));

        let err = RepositoryError::Get {
            id: 22,
            source: DatabaseError::QueryFailed("disk I/O error".to_string()),
        };
        assert!(err.to_string().contains("22"));
    }
}

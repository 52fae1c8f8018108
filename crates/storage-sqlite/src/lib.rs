//! SQLite storage implementation for stock indices.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository trait defined in `stockindex-core` and contains:
//! - Database connection pooling and management
//! - Scoped transactions that commit only when marked complete
//! - The stock index repository
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The `core` crate is database-agnostic and works with the repository trait.
//!
//! ```text
//!       core (domain, statistics)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod stock_indices;

// Re-export database utilities
pub use db::{
    create_pool, create_schema, drop_schema, get_connection, get_db_path, init, reset_schema,
    DbConnection, DbPool, DbTransactionExecutor, TransactionOutcome, TransactionScope,
    DB_FILE_NAME, DEFAULT_POOL_SIZE,
};

// Re-export error types
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use stock_indices::StockIndexRepository;

// Re-export from core for convenience
pub use stockindex_core::errors::{DatabaseError, RepositoryError, Result};

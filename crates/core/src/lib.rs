//! Stock Index Core - Domain entities, statistics, and traits.
//!
//! This crate contains the stock index aggregate and the statistics derived
//! from its quote history. It is database-agnostic and defines the repository
//! trait that is implemented by the `storage-sqlite` crate.

pub mod errors;
pub mod statistics;
pub mod stock_indices;

// Re-export the aggregate types
pub use stock_indices::{StockIndex, StockIndexQuote, StockIndexRepositoryTrait};

// Re-export error types
pub use errors::{DatabaseError, RepositoryError, Result};

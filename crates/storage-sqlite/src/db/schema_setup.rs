//! Out-of-band schema bootstrap.
//!
//! The repository never calls these functions; it expects both tables to be
//! present. They exist for the command line `init-db` command and for tests.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use log::info;

use crate::errors::IntoCore;
use stockindex_core::errors::DatabaseError;

const CREATE_SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS stock_indices (
    id INTEGER PRIMARY KEY,
    symbol VARCHAR(100) NOT NULL,
    mean FLOAT,
    variance FLOAT,
    skew FLOAT,
    kurtosis FLOAT
);

CREATE TABLE IF NOT EXISTS stock_index_quotes (
    value NUMERIC NOT NULL,
    value_date DATE NOT NULL,
    stockindex_id INTEGER NOT NULL,
    FOREIGN KEY (stockindex_id) REFERENCES stock_indices (id),
    PRIMARY KEY (value_date, stockindex_id)
);
";

const DROP_SCHEMA_SQL: &str = r"
DROP TABLE IF EXISTS stock_index_quotes;
DROP TABLE IF EXISTS stock_indices;
";

/// Creates both tables unless they already exist.
pub fn create_schema(conn: &mut SqliteConnection) -> Result<(), DatabaseError> {
    conn.batch_execute(CREATE_SCHEMA_SQL).into_core()
}

/// Drops the quote table and then the index table.
pub fn drop_schema(conn: &mut SqliteConnection) -> Result<(), DatabaseError> {
    conn.batch_execute(DROP_SCHEMA_SQL).into_core()
}

/// Drops and recreates the schema in one transaction, discarding all data.
pub fn reset_schema(conn: &mut SqliteConnection) -> Result<(), DatabaseError> {
    conn.immediate_transaction(|c| {
        c.batch_execute(DROP_SCHEMA_SQL)?;
        c.batch_execute(CREATE_SCHEMA_SQL)
    })
    .into_core()?;

    info!("Stock index schema recreated");
    Ok(())
}

use log::{error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;

use crate::errors::{IntoCore, StorageError};
use crate::stock_indices::StockIndexRepository;
use stockindex_core::errors::{DatabaseError, Result};

pub mod schema_setup;
pub mod transaction;

pub use schema_setup::{create_schema, drop_schema, reset_schema};
pub use transaction::{TransactionOutcome, TransactionScope};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Name of the database file inside the data directory.
pub const DB_FILE_NAME: &str = "stockindex.db";

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Prepares the database file and returns its path.
///
/// Creates the parent directory when missing and switches the file to WAL
/// journaling. The schema itself is bootstrapped separately (see
/// [`schema_setup`]).
pub fn init(app_data_dir: &str) -> std::result::Result<String, DatabaseError> {
    let db_path = get_db_path(app_data_dir);

    // 1. Ensure directory exists
    if let Some(db_dir) = Path::new(&db_path).parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir).map_err(StorageError::from)?;
        }
    }

    {
        let mut conn = SqliteConnection::establish(&db_path).map_err(StorageError::from)?;
        conn.batch_execute(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous  = NORMAL;
        ",
        )
        .into_core()?;
    }

    info!("Database initialized at {}", db_path);
    Ok(db_path)
}

pub fn create_pool(db_path: &str, max_size: u32) -> std::result::Result<Arc<DbPool>, DatabaseError> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = r2d2::Pool::builder()
        .max_size(max_size.max(1))
        .min_idle(Some(1)) // Keep at least one connection ready
        .connection_timeout(std::time::Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer {}))
        .build(manager)
        .map_err(|e| {
            error!("Failed to create database pool for {}: {}", db_path, e);
            DatabaseError::PoolCreationFailed(e.to_string())
        })?;
    Ok(Arc::new(pool))
}

pub fn get_db_path(app_data_dir: &str) -> String {
    // Try to get the database URL from the environment variable
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        Path::new(app_data_dir)
            .join(DB_FILE_NAME)
            .to_string_lossy()
            .into_owned()
    })
}

/// Gets a connection from the pool
pub fn get_connection(
    pool: &Pool<ConnectionManager<SqliteConnection>>,
) -> std::result::Result<DbConnection, DatabaseError> {
    pool.get().into_core()
}

#[derive(Debug)]
struct ConnectionCustomizer;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous = NORMAL;
        ",
        )
        .map_err(diesel::r2d2::Error::QueryError)?;

        Ok(())
    }
}

/// Trait for executing a unit of work against the stock index repository
pub trait DbTransactionExecutor {
    /// Runs `f` inside one repository scope. The scope commits when `f`
    /// returns `Ok` and rolls back otherwise.
    fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StockIndexRepository) -> Result<T>;
}

/// Implementation of DbTransactionExecutor for DbPool
impl DbTransactionExecutor for DbPool {
    fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StockIndexRepository) -> Result<T>,
    {
        let mut repository = StockIndexRepository::open(self)?;

        match f(&mut repository) {
            Ok(value) => {
                repository.complete();
                repository.close()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(close_err) = repository.close() {
                    error!("Failed to roll back after error '{}': {}", e, close_err);
                }
                Err(e)
            }
        }
    }
}

/// Implementation of DbTransactionExecutor for Arc<DbPool>
impl DbTransactionExecutor for Arc<DbPool> {
    fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StockIndexRepository) -> Result<T>,
    {
        (**self).execute(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock_indices::StockIndexRepository;
    use chrono::NaiveDate;
    use stockindex_core::{RepositoryError, StockIndex, StockIndexQuote};
    use tempfile::tempdir;

    fn create_test_pool() -> (Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy(), 2).expect("Failed to create pool");
        let mut conn = get_connection(&pool).expect("Failed to get connection");
        reset_schema(&mut conn).expect("Failed to create schema");
        (pool, temp_dir)
    }

    #[test]
    fn test_init_creates_missing_directory() {
        if std::env::var("DATABASE_URL").is_ok() {
            return;
        }
        let temp_dir = tempdir().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");

        let db_path = init(&data_dir.to_string_lossy()).unwrap();

        assert!(data_dir.exists());
        assert!(db_path.ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_pooled_connections_enforce_foreign_keys() {
        let (pool, _temp_dir) = create_test_pool();
        let mut conn = get_connection(&pool).unwrap();

        let result = conn.batch_execute(
            "INSERT INTO stock_index_quotes (value, value_date, stockindex_id) \
             VALUES (1.0, '2016-01-04', 99)",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_commits_on_ok() {
        let (pool, _temp_dir) = create_test_pool();
        let index = StockIndex::with_quotes(
            1,
            "WIG20",
            vec![StockIndexQuote::new(
                2000.0,
                NaiveDate::from_ymd_opt(2016, 1, 4).unwrap(),
            )],
        );

        pool.execute(|repo| repo.add(&index)).unwrap();

        let mut repo = StockIndexRepository::open(&pool).unwrap();
        assert_eq!(repo.get_by_id(1).unwrap(), Some(index));
    }

    #[test]
    fn test_execute_rolls_back_on_err() {
        let (pool, _temp_dir) = create_test_pool();

        let result: Result<()> = pool.execute(|repo| {
            repo.add(&StockIndex::new(1, "WIG20"))?;
            repo.delete(42)
        });
        assert!(matches!(result, Err(RepositoryError::NotFound(42))));

        let mut repo = StockIndexRepository::open(&pool).unwrap();
        assert_eq!(repo.get_by_id(1).unwrap(), None);
    }
}

//! Scoped transaction bound to one pooled connection.

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::sqlite::SqliteConnection;
use log::{debug, error, warn};

use super::{get_connection, DbConnection, DbPool};
use crate::errors::{IntoCore, StorageError};
use stockindex_core::errors::{DatabaseError, RepositoryError, Result};

/// How a [`TransactionScope`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Committed,
    RolledBack,
}

/// One connection and the transaction open on it.
///
/// The transaction commits only if [`complete`](Self::complete) was called
/// before the scope is finished, and rolls back otherwise. Finishing happens
/// in [`close`](Self::close), which reports failures, or in `Drop` when the
/// scope goes out of scope unclosed, which can only log them. The connection
/// goes back to the pool when the scope is dropped, on every path.
pub struct TransactionScope {
    conn: DbConnection,
    completed: bool,
    finished: bool,
}

impl TransactionScope {
    /// Acquires a connection and begins a transaction on it.
    pub fn begin(pool: &DbPool) -> Result<Self> {
        let mut conn = get_connection(pool).map_err(RepositoryError::Connection)?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .into_core()
            .map_err(RepositoryError::Connection)?;

        debug!("Transaction opened");
        Ok(Self {
            conn,
            completed: false,
            finished: false,
        })
    }

    /// Marks the work done in this scope as successful.
    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Commits or rolls back, then releases the connection.
    pub fn close(mut self) -> Result<TransactionOutcome> {
        self.finish().map_err(RepositoryError::Close)
    }

    fn finish(&mut self) -> std::result::Result<TransactionOutcome, DatabaseError> {
        self.finished = true;
        let conn: &mut SqliteConnection = &mut self.conn;

        if !self.completed {
            warn!("Rolling back transaction that was not marked complete");
            AnsiTransactionManager::rollback_transaction(conn).into_core()?;
            return Ok(TransactionOutcome::RolledBack);
        }

        match AnsiTransactionManager::commit_transaction(conn) {
            Ok(()) => {
                debug!("Transaction committed");
                Ok(TransactionOutcome::Committed)
            }
            Err(commit_err) => {
                error!("Transaction commit failed: {}", commit_err);
                let still_open = matches!(
                    AnsiTransactionManager::transaction_manager_status_mut(conn).transaction_depth(),
                    Ok(Some(_))
                );
                if still_open {
                    if let Err(rollback_err) = AnsiTransactionManager::rollback_transaction(conn) {
                        error!("Rollback after failed commit also failed: {}", rollback_err);
                    }
                }
                Err(StorageError::from(commit_err).into())
            }
        }
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.finish() {
            error!("Failed to finish transaction while releasing its connection: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, reset_schema};
    use diesel::connection::SimpleConnection;
    use diesel::prelude::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    use crate::schema::stock_indices;

    fn create_test_pool() -> (Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy(), 2).expect("Failed to create pool");
        reset_schema(&mut get_connection(&pool).unwrap()).expect("Failed to create schema");
        (pool, temp_dir)
    }

    fn index_count(pool: &DbPool) -> i64 {
        let mut conn = get_connection(pool).unwrap();
        stock_indices::table.count().get_result(&mut conn).unwrap()
    }

    fn insert_index(scope: &mut TransactionScope, id: i64) {
        scope
            .connection()
            .batch_execute(&format!(
                "INSERT INTO stock_indices (id, symbol) VALUES ({}, 'WIG20')",
                id
            ))
            .unwrap();
    }

    #[test]
    fn test_close_commits_when_completed() {
        let (pool, _temp_dir) = create_test_pool();

        let mut scope = TransactionScope::begin(&pool).unwrap();
        insert_index(&mut scope, 1);
        scope.complete();
        assert!(scope.is_completed());

        assert_eq!(scope.close().unwrap(), TransactionOutcome::Committed);
        assert_eq!(index_count(&pool), 1);
    }

    #[test]
    fn test_close_rolls_back_when_not_completed() {
        let (pool, _temp_dir) = create_test_pool();

        let mut scope = TransactionScope::begin(&pool).unwrap();
        insert_index(&mut scope, 1);

        assert_eq!(scope.close().unwrap(), TransactionOutcome::RolledBack);
        assert_eq!(index_count(&pool), 0);
    }

    #[test]
    fn test_drop_rolls_back_uncompleted_scope() {
        let (pool, _temp_dir) = create_test_pool();

        {
            let mut scope = TransactionScope::begin(&pool).unwrap();
            insert_index(&mut scope, 1);
        }

        assert_eq!(index_count(&pool), 0);
    }

    #[test]
    fn test_drop_commits_completed_scope() {
        let (pool, _temp_dir) = create_test_pool();

        {
            let mut scope = TransactionScope::begin(&pool).unwrap();
            insert_index(&mut scope, 1);
            scope.complete();
        }

        assert_eq!(index_count(&pool), 1);
    }

    #[test]
    fn test_connection_is_returned_to_pool() {
        let (pool, _temp_dir) = create_test_pool();

        for id in 0..5 {
            let mut scope = TransactionScope::begin(&pool).unwrap();
            insert_index(&mut scope, id);
            scope.complete();
            scope.close().unwrap();
        }

        assert_eq!(index_count(&pool), 5);
        assert!(pool.state().connections <= 2);
    }

    #[test]
    fn test_failed_commit_is_reported() {
        let (pool, _temp_dir) = create_test_pool();

        let mut scope = TransactionScope::begin(&pool).unwrap();
        // A deferred foreign key is only checked at COMMIT.
        scope
            .connection()
            .batch_execute(
                "PRAGMA defer_foreign_keys = ON;
                 INSERT INTO stock_index_quotes (value, value_date, stockindex_id)
                 VALUES (1.0, '2016-01-04', 99);",
            )
            .unwrap();
        scope.complete();

        let result = scope.close();
        assert!(matches!(result, Err(RepositoryError::Close(_))));

        let mut conn = get_connection(&pool).unwrap();
        let quotes: i64 = crate::schema::stock_index_quotes::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(quotes, 0);
    }
}

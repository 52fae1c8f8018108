use diesel::prelude::*;
use log::{debug, error};

use super::model::{StockIndexDB, StockIndexQuoteDB};
use crate::db::{DbPool, TransactionOutcome, TransactionScope};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{stock_index_quotes, stock_indices};
use stockindex_core::errors::{RepositoryError, Result};
use stockindex_core::{StockIndex, StockIndexQuote, StockIndexRepositoryTrait};

/// Repository of stock indices and their quotes, bound to one transaction.
///
/// Opening the repository acquires a connection and begins a transaction.
/// Everything staged through it commits only if [`complete`](Self::complete)
/// is called before [`close`](Self::close) (or before the repository is
/// dropped); otherwise it is rolled back.
pub struct StockIndexRepository {
    scope: TransactionScope,
}

impl StockIndexRepository {
    pub fn open(pool: &DbPool) -> Result<Self> {
        Ok(StockIndexRepository {
            scope: TransactionScope::begin(pool)?,
        })
    }

    pub fn complete(&mut self) {
        self.scope.complete();
    }

    /// Commits or rolls back the transaction and releases the connection.
    pub fn close(self) -> Result<TransactionOutcome> {
        self.scope.close()
    }

    pub fn add(&mut self, index: &StockIndex) -> Result<()> {
        let conn = self.scope.connection();

        diesel::insert_into(stock_indices::table)
            .values(StockIndexDB::from(index))
            .execute(conn)
            .into_core()
            .map_err(|source| {
                error!("Failed to insert index {}: {}", index.id, source);
                RepositoryError::Add {
                    index: index.to_string(),
                    source,
                }
            })?;

        for quote in index.quotes() {
            let inserted = match StockIndexQuoteDB::new(index.id, quote) {
                Ok(row) => diesel::insert_into(stock_index_quotes::table)
                    .values(row)
                    .execute(&mut *conn)
                    .map_err(StorageError::from),
                Err(e) => Err(e),
            };

            inserted.into_core().map_err(|source| {
                error!(
                    "Failed to insert quote {} {} for index {}: {}",
                    quote.value(),
                    quote.value_date().format("%Y-%m-%d"),
                    index.id,
                    source
                );
                RepositoryError::AddQuote {
                    quote: quote.to_string(),
                    index: index.to_string(),
                    source,
                }
            })?;
        }

        debug!("Added index {} with {} quotes", index.id, index.quotes().len());
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let conn = self.scope.connection();
        let into_delete_error = |source| RepositoryError::Delete { id, source };

        let quotes_deleted = diesel::delete(
            stock_index_quotes::table.filter(stock_index_quotes::stockindex_id.eq(id)),
        )
        .execute(conn)
        .into_core()
        .map_err(into_delete_error)?;

        let indices_deleted = diesel::delete(stock_indices::table.find(id))
            .execute(conn)
            .into_core()
            .map_err(into_delete_error)?;

        if indices_deleted == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        debug!("Deleted index {} and {} quotes", id, quotes_deleted);
        Ok(())
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<StockIndex>> {
        let conn = self.scope.connection();
        let into_get_error = |source| RepositoryError::Get { id, source };

        let index_db = stock_indices::table
            .find(id)
            .select(StockIndexDB::as_select())
            .first::<StockIndexDB>(conn)
            .optional()
            .into_core()
            .map_err(into_get_error)?;

        let Some(index_db) = index_db else {
            debug!("Index {} not found", id);
            return Ok(None);
        };

        let quotes = StockIndexQuoteDB::belonging_to(&index_db)
            .select(StockIndexQuoteDB::as_select())
            .order(stock_index_quotes::value_date.asc())
            .load::<StockIndexQuoteDB>(conn)
            .into_core()
            .map_err(into_get_error)?
            .into_iter()
            .map(StockIndexQuote::from)
            .collect();

        // Stored statistics are ignored; the aggregate recomputes them from its quotes
        let index = StockIndex::with_quotes(index_db.id, index_db.symbol, quotes);
        if index_db.mean != Some(index.mean()) {
            debug!(
                "Stored statistics of index {} are stale (stored mean {:?}, recomputed {})",
                id,
                index_db.mean,
                index.mean()
            );
        }

        Ok(Some(index))
    }

    pub fn update(&mut self, index: &StockIndex) -> Result<()> {
        self.replace(index).map_err(|source| {
            error!("Failed to update index {}: {}", index.id, source);
            RepositoryError::Update {
                index: index.to_string(),
                source: Box::new(source),
            }
        })
    }

    fn replace(&mut self, index: &StockIndex) -> Result<()> {
        if let Some(existing) = self.get_by_id(index.id)? {
            self.delete(existing.id)?;
        }
        self.add(index)
    }
}

impl StockIndexRepositoryTrait for StockIndexRepository {
    fn add(&mut self, index: &StockIndex) -> Result<()> {
        StockIndexRepository::add(self, index)
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        StockIndexRepository::delete(self, id)
    }

    fn get_by_id(&mut self, id: i64) -> Result<Option<StockIndex>> {
        StockIndexRepository::get_by_id(self, id)
    }

    fn update(&mut self, index: &StockIndex) -> Result<()> {
        StockIndexRepository::update(self, index)
    }

    fn complete(&mut self) {
        StockIndexRepository::complete(self)
    }
}

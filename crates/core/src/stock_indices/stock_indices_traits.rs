use crate::errors::Result;
use crate::stock_indices::stock_indices_model::StockIndex;

/// Trait for stock index repository operations.
///
/// An implementation is bound to one open transaction. Nothing it stages
/// becomes durable unless `complete` is called before the transaction closes.
pub trait StockIndexRepositoryTrait {
    /// Stages the index row followed by one row per quote.
    fn add(&mut self, index: &StockIndex) -> Result<()>;

    /// Removes the quotes and then the index row. Fails with
    /// `RepositoryError::NotFound` when no index has this id.
    fn delete(&mut self, id: i64) -> Result<()>;

    /// Loads the full aggregate, or `None` when no index has this id.
    fn get_by_id(&mut self, id: i64) -> Result<Option<StockIndex>>;

    /// Replaces any stored aggregate with the same id by `index`.
    fn update(&mut self, index: &StockIndex) -> Result<()>;

    /// Marks the transaction as successful so that it commits on close.
    fn complete(&mut self);
}

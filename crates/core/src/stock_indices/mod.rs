//! Stock indices module - the index aggregate, its quotes, and the repository trait.

mod stock_indices_model;
mod stock_indices_traits;

pub use stock_indices_model::{StockIndex, StockIndexQuote};
pub use stock_indices_traits::StockIndexRepositoryTrait;

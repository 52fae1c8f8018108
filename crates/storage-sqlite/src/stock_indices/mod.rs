//! SQLite storage implementation for stock indices and their quotes.

mod model;
mod repository;

pub use model::{StockIndexDB, StockIndexQuoteDB};
pub use repository::StockIndexRepository;

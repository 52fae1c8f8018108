//! Database models for stock indices and their quotes.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::errors::StorageError;
use stockindex_core::{StockIndex, StockIndexQuote};

/// Database model for stock indices
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::stock_indices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockIndexDB {
    pub id: i64,
    pub symbol: String,
    pub mean: Option<f64>,
    pub variance: Option<f64>,
    pub skew: Option<f64>,
    pub kurtosis: Option<f64>,
}

/// Database model for quotes
#[derive(
    Queryable, Identifiable, Selectable, Insertable, Associations, Debug, Clone, PartialEq,
)]
#[diesel(belongs_to(StockIndexDB, foreign_key = stockindex_id))]
#[diesel(table_name = crate::schema::stock_index_quotes)]
#[diesel(primary_key(value_date, stockindex_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockIndexQuoteDB {
    pub value: f64,
    pub value_date: NaiveDate,
    pub stockindex_id: i64,
}

// Conversion implementations

impl From<&StockIndex> for StockIndexDB {
    fn from(index: &StockIndex) -> Self {
        StockIndexDB {
            id: index.id,
            symbol: index.symbol.clone(),
            mean: Some(index.mean()),
            variance: Some(index.variance()),
            skew: Some(index.skew()),
            kurtosis: Some(index.kurtosis()),
        }
    }
}

impl StockIndexQuoteDB {
    /// Builds the row for `quote` owned by the index `stockindex_id`.
    ///
    /// Rejects NaN, which SQLite would bind as NULL.
    pub fn new(stockindex_id: i64, quote: &StockIndexQuote) -> Result<Self, StorageError> {
        if quote.value().is_nan() {
            return Err(StorageError::InvalidValue(format!(
                "quote value on {} is NaN",
                quote.value_date()
            )));
        }

        Ok(StockIndexQuoteDB {
            value: quote.value(),
            value_date: quote.value_date(),
            stockindex_id,
        })
    }
}

impl From<StockIndexQuoteDB> for StockIndexQuote {
    fn from(db: StockIndexQuoteDB) -> Self {
        StockIndexQuote::new(db.value, db.value_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 1, d).unwrap()
    }

    #[test]
    fn test_index_row_carries_current_statistics() {
        let index = StockIndex::with_quotes(
            1,
            "WIG20",
            vec![
                StockIndexQuote::new(2000.0, day(4)),
                StockIndexQuote::new(1900.0, day(5)),
            ],
        );
        let row = StockIndexDB::from(&index);
        assert_eq!(row.symbol, "WIG20");
        assert_eq!(row.mean, Some(1950.0));
        assert_eq!(row.variance, Some(5000.0));
    }

    #[test]
    fn test_quote_row_keeps_value_bits() {
        for value in [0.1 + 0.2, 1234.5678901234567, 1e-30, 1e30, f64::INFINITY] {
            let row = StockIndexQuoteDB::new(7, &StockIndexQuote::new(value, day(4))).unwrap();
            assert_eq!(row.value, value);
            assert_eq!(row.stockindex_id, 7);
            assert_eq!(StockIndexQuote::from(row).value(), value);
        }
    }

    #[test]
    fn test_nan_quote_value_is_rejected() {
        let result = StockIndexQuoteDB::new(1, &StockIndexQuote::new(f64::NAN, day(4)));
        assert!(matches!(result, Err(StorageError::InvalidValue(_))));
    }
}

//! Stock index domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::statistics::{self, Moments};

/// A single daily closing quote of an index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockIndexQuote {
    value: f64,
    value_date: NaiveDate,
}

impl StockIndexQuote {
    pub fn new(value: f64, value_date: NaiveDate) -> Self {
        Self { value, value_date }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn value_date(&self) -> NaiveDate {
        self.value_date
    }
}

impl fmt::Display for StockIndexQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{StockIndexQuote: {{value: {:.6}, value_date: {}}}}}",
            self.value, self.value_date
        )
    }
}

/// A stock index together with its quote history.
///
/// The derived statistics always describe the current quote list: they are
/// recomputed whenever the list is replaced and cannot be set from outside.
/// Quotes are kept in ascending `value_date` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockIndex {
    pub id: i64,
    pub symbol: String,
    mean: f64,
    variance: f64,
    skew: f64,
    kurtosis: f64,
    quotes: Vec<StockIndexQuote>,
}

impl StockIndex {
    /// Creates an index without quotes; all statistics are zero.
    pub fn new(id: i64, symbol: impl Into<String>) -> Self {
        Self::with_quotes(id, symbol, Vec::new())
    }

    pub fn with_quotes(id: i64, symbol: impl Into<String>, quotes: Vec<StockIndexQuote>) -> Self {
        let mut index = Self {
            id,
            symbol: symbol.into(),
            mean: 0.0,
            variance: 0.0,
            skew: 0.0,
            kurtosis: 0.0,
            quotes,
        };
        index.sort_quotes();
        index.update_statistics();
        index
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }

    pub fn moments(&self) -> Moments {
        Moments {
            mean: self.mean,
            variance: self.variance,
            skew: self.skew,
            kurtosis: self.kurtosis,
        }
    }

    pub fn quotes(&self) -> &[StockIndexQuote] {
        &self.quotes
    }

    /// Replaces the whole quote history and re-derives the statistics.
    pub fn set_quotes(&mut self, quotes: Vec<StockIndexQuote>) {
        self.quotes = quotes;
        self.sort_quotes();
        self.update_statistics();
    }

    /// Recomputes the derived statistics from the current quotes.
    ///
    /// An index without quotes has all four statistics set to `0.0`.
    pub fn update_statistics(&mut self) {
        let values: Vec<f64> = self.quotes.iter().map(StockIndexQuote::value).collect();
        let moments = statistics::describe(&values).unwrap_or_default();

        self.mean = moments.mean;
        self.variance = moments.variance;
        self.skew = moments.skew;
        self.kurtosis = moments.kurtosis;
    }

    fn sort_quotes(&mut self) {
        self.quotes.sort_by_key(StockIndexQuote::value_date);
    }
}

impl fmt::Display for StockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{StockIndex: {{id: {}, symbol: \"{}\", mean: {:.6}, variance: {:.6}, skew: {:.6}, kurtosis: {:.6}, quotes: [",
            self.id, self.symbol, self.mean, self.variance, self.skew, self.kurtosis
        )?;
        for (i, quote) in self.quotes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", quote)?;
        }
        f.write_str("]}}")
    }
}

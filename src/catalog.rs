//! The read-only stock catalog and the built-in dataset.

use crate::error::CatalogError;
use crate::models::{MarketIndex, StockRecord};
use std::collections::HashSet;
use std::sync::Arc;

/// Immutable, ordered universe of stocks.
///
/// Validated once on construction and never mutated afterwards. Cloning shares
/// the underlying records.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Arc<[StockRecord]>,
}

impl Catalog {
    /// Validate and wrap a list of records, keeping their order.
    pub fn new(records: Vec<StockRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();

        for record in &records {
            if record.symbol.trim().is_empty() {
                return Err(CatalogError::EmptySymbol);
            }
            if !record.current_price.is_finite() {
                return Err(CatalogError::NonFinite {
                    symbol: record.symbol.clone(),
                    field: "current_price",
                });
            }
            if !record.change.is_finite() {
                return Err(CatalogError::NonFinite {
                    symbol: record.symbol.clone(),
                    field: "change",
                });
            }
            if !seen.insert(record.symbol.to_ascii_uppercase()) {
                return Err(CatalogError::DuplicateSymbol {
                    symbol: record.symbol.clone(),
                });
            }
        }

        Ok(Self {
            records: records.into(),
        })
    }

    /// The compiled-in dataset.
    pub fn builtin() -> Self {
        Self {
            records: builtin_stocks().into(),
        }
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StockRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&StockRecord> {
        self.records.first()
    }

    /// Look a record up by symbol, ignoring case.
    pub fn find(&self, symbol: &str) -> Option<&StockRecord> {
        self.records
            .iter()
            .find(|r| r.symbol.eq_ignore_ascii_case(symbol))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a StockRecord;
    type IntoIter = std::slice::Iter<'a, StockRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[allow(clippy::too_many_arguments)]
fn stock(
    symbol: &str,
    name: &str,
    sector: &str,
    price: f64,
    change: f64,
    volume: u64,
    market_cap: u64,
    day_low: f64,
    day_high: f64,
) -> StockRecord {
    let previous = price - change;
    StockRecord {
        change_percent: if previous == 0.0 {
            0.0
        } else {
            change / previous * 100.0
        },
        volume,
        market_cap: Some(market_cap),
        sector: sector.to_string(),
        day_high,
        day_low,
        ..StockRecord::new(symbol, name, price, change)
    }
}

fn builtin_stocks() -> Vec<StockRecord> {
    vec![
        stock("AAPL", "Apple Inc.", "Technology", 189.84, 2.31, 52_164_300, 2_950_000_000_000, 186.90, 190.32),
        stock("GOOGL", "Alphabet Inc.", "Communication Services", 141.80, -0.92, 24_731_100, 1_780_000_000_000, 140.61, 143.02),
        stock("MSFT", "Microsoft Corporation", "Technology", 378.91, 4.17, 21_418_900, 2_810_000_000_000, 373.50, 380.11),
        stock("AMZN", "Amazon.com Inc.", "Consumer Cyclical", 153.42, 1.08, 40_212_700, 1_590_000_000_000, 151.70, 154.26),
        stock("NVDA", "NVIDIA Corporation", "Technology", 495.22, 12.64, 44_906_200, 1_220_000_000_000, 480.15, 498.77),
        stock("TSLA", "Tesla Inc.", "Consumer Cyclical", 248.48, -6.17, 118_340_500, 790_000_000_000, 245.02, 256.30),
        stock("META", "Meta Platforms Inc.", "Communication Services", 353.96, 3.02, 14_829_300, 910_000_000_000, 349.10, 355.48),
        stock("JPM", "JPMorgan Chase & Co.", "Financial Services", 170.31, -0.45, 9_208_600, 492_000_000_000, 169.55, 171.40),
    ]
}

/// The compiled-in market overview rows.
pub fn builtin_markets() -> Vec<MarketIndex> {
    vec![
        MarketIndex::new("S&P 500", 4_783.45, 0.42),
        MarketIndex::new("NASDAQ", 15_011.35, 0.78),
        MarketIndex::new("DOW", 37_545.33, -0.12),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let validated = Catalog::new(builtin.records().to_vec()).unwrap();
        assert_eq!(validated.len(), builtin.len());
        assert!(builtin.len() >= 3);
    }

    #[test]
    fn test_empty_catalog_is_allowed() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.first().is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let err = Catalog::new(vec![
            StockRecord::new("AAPL", "Apple", 150.0, 1.0),
            StockRecord::new("aapl", "Apple again", 151.0, 1.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateSymbol {
                symbol: "aapl".to_string()
            }
        );
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let err = Catalog::new(vec![StockRecord::new("BAD", "Bad", f64::NAN, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NonFinite {
                field: "current_price",
                ..
            }
        ));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find("msft").map(|s| s.name.as_str()), Some("Microsoft Corporation"));
        assert!(catalog.find("NOPE").is_none());
    }

    #[test]
    fn test_clone_shares_records() {
        let a = Catalog::builtin();
        let b = a.clone();
        assert!(std::ptr::eq(a.records().as_ptr(), b.records().as_ptr()));
    }
}

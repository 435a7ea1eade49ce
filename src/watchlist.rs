//! Pinned stocks, deduplicated by symbol and kept in insertion order.

use crate::models::StockRecord;

/// Append-only list of pinned stocks.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    entries: Vec<StockRecord>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a watchlist from initial entries, dropping repeated symbols.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = StockRecord>,
    {
        let mut watchlist = Self::new();
        for entry in entries {
            watchlist.add(entry);
        }
        watchlist
    }

    /// Append `stock` unless an entry with the same symbol is already pinned.
    ///
    /// Returns `true` when the watchlist changed.
    pub fn add(&mut self, stock: StockRecord) -> bool {
        if self.contains(&stock.symbol) {
            return false;
        }
        self.entries.push(stock);
        true
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.iter().any(|s| s.symbol == symbol)
    }

    pub fn get(&self, index: usize) -> Option<&StockRecord> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[StockRecord] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StockRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Watchlist {
    type Item = &'a StockRecord;
    type IntoIter = std::slice::Iter<'a, StockRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

//! Case-insensitive substring search over the catalog.

use crate::catalog::Catalog;
use crate::models::StockRecord;

/// Check whether a record matches an already-lowercased, non-empty needle.
pub fn matches(stock: &StockRecord, needle: &str) -> bool {
    stock.symbol.to_lowercase().contains(needle) || stock.name.to_lowercase().contains(needle)
}

/// Return the catalog entries whose symbol or name contains `query`.
///
/// An empty query returns nothing rather than the whole catalog, so the
/// results panel stays hidden until the user types. Catalog order is kept.
pub fn search(catalog: &Catalog, query: &str) -> Vec<StockRecord> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|stock| matches(stock, &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_catalog() -> Catalog {
        Catalog::new(vec![
            StockRecord::new("AAPL", "Apple Inc.", 150.0, 1.2),
            StockRecord::new("GOOG", "Alphabet Inc.", 2800.0, -4.0),
            StockRecord::new("MSFT", "Microsoft Corporation", 300.0, 0.8),
        ])
        .unwrap()
    }

    fn symbols(results: &[StockRecord]) -> Vec<&str> {
        results.iter().map(|s| s.symbol.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        assert!(search(&scenario_catalog(), "").is_empty());
        assert!(search(&Catalog::builtin(), "").is_empty());
        assert!(search(&Catalog::new(Vec::new()).unwrap(), "").is_empty());
    }

    #[test]
    fn test_symbol_match_is_case_insensitive() {
        assert_eq!(symbols(&search(&scenario_catalog(), "goo")), vec!["GOOG"]);
        assert_eq!(symbols(&search(&scenario_catalog(), "GoO")), vec!["GOOG"]);
    }

    #[test]
    fn test_name_match() {
        assert_eq!(symbols(&search(&scenario_catalog(), "micro")), vec!["MSFT"]);
    }

    #[test]
    fn test_results_keep_catalog_order() {
        // "inc." is in Apple and Alphabet; "a" hits every entry.
        assert_eq!(symbols(&search(&scenario_catalog(), "inc.")), vec!["AAPL", "GOOG"]);
        assert_eq!(
            symbols(&search(&scenario_catalog(), "a")),
            vec!["AAPL", "GOOG", "MSFT"]
        );
    }

    #[test]
    fn test_unmatched_query_is_empty() {
        assert!(search(&scenario_catalog(), "zzz").is_empty());
    }

    #[test]
    fn test_whitespace_query_is_not_trimmed() {
        // A lone space still filters; only the empty string suppresses results.
        assert_eq!(
            symbols(&search(&scenario_catalog(), " ")),
            vec!["AAPL", "GOOG", "MSFT"]
        );
        assert!(search(&scenario_catalog(), "  ").is_empty());
    }

    #[test]
    fn test_results_are_exactly_the_matching_subset() {
        let catalog = Catalog::builtin();
        for query in ["a", "T", "corp", "inc", "x", "nv", "meta platforms", "."] {
            let needle = query.to_lowercase();
            let results = search(&catalog, query);
            let expected: Vec<&StockRecord> =
                catalog.iter().filter(|s| matches(s, &needle)).collect();
            assert_eq!(results.len(), expected.len(), "query {query:?}");
            for (got, want) in results.iter().zip(expected) {
                assert_eq!(got, want, "query {query:?}");
            }
        }
    }
}

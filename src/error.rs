//! Error types for catalog loading and dashboard startup.

use thiserror::Error;

/// Problems found while validating a catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("duplicate symbol '{symbol}' in catalog")]
    DuplicateSymbol { symbol: String },
    #[error("field '{field}' of '{symbol}' must be finite")]
    NonFinite {
        symbol: String,
        field: &'static str,
    },
}

/// Errors that prevent a dashboard from starting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("catalog is empty, at least one stock is required to pick an initial selection")]
    EmptyCatalog,
}

/// Whether `err` was caused by the stock catalog rather than by the command line.
pub fn is_catalog_error(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.is::<CatalogError>() || cause.is::<DashboardError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_catalog_errors_are_recognised_through_context() {
        let validation: anyhow::Result<()> = Err(CatalogError::EmptySymbol)
            .context("Invalid stock catalog in config");
        assert!(is_catalog_error(&validation.unwrap_err()));

        let empty = anyhow::Error::from(DashboardError::EmptyCatalog);
        assert!(is_catalog_error(&empty));
    }

    #[test]
    fn test_other_errors_are_not_catalog_errors() {
        let err = anyhow::anyhow!("Unknown symbol for --watch: NOPE");
        assert!(!is_catalog_error(&err));
    }
}

//! Data models for the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tradable instrument as shown on the dashboard.
///
/// Only `symbol`, `name`, `current_price` and `change` take part in the
/// dashboard's behaviour. Everything else is descriptive and passes through
/// untouched, including through simulator ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Ticker symbol (e.g., "AAPL"), unique within a catalog
    pub symbol: String,
    /// Company name
    pub name: String,
    /// Current price
    pub current_price: f64,
    /// Price change over the reference period
    pub change: f64,
    /// Percentage change over the reference period
    #[serde(default)]
    pub change_percent: f64,
    /// Trading volume
    #[serde(default)]
    pub volume: u64,
    /// Market capitalization
    #[serde(default)]
    pub market_cap: Option<u64>,
    /// Sector the company belongs to
    #[serde(default)]
    pub sector: String,
    /// Day's high price
    #[serde(default)]
    pub day_high: f64,
    /// Day's low price
    #[serde(default)]
    pub day_low: f64,
}

impl StockRecord {
    /// Build a record with only the fields the dashboard acts on.
    pub fn new(symbol: &str, name: &str, current_price: f64, change: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price,
            change,
            change_percent: 0.0,
            volume: 0,
            market_cap: None,
            sector: String::new(),
            day_high: current_price,
            day_low: current_price,
        }
    }
}

/// A row of the market overview panel. Static, never simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndex {
    /// Index name (e.g., "S&P 500")
    pub name: String,
    /// Index level
    pub value: f64,
    /// Percentage change on the day
    pub change_percent: f64,
}

impl MarketIndex {
    pub fn new(name: &str, value: f64, change_percent: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            change_percent,
        }
    }
}

/// One sample of the selected stock's price, used by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// When the price was observed
    pub at: DateTime<Utc>,
    /// Observed price
    pub price: f64,
}

/// Risk label shown next to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let stock = StockRecord::new("TSLA", "Tesla", 700.0, 5.0);
        assert_eq!(stock.symbol, "TSLA");
        assert_eq!(stock.market_cap, None);
        assert_eq!(stock.day_high, 700.0);
        assert_eq!(stock.day_low, 700.0);
    }

    #[test]
    fn test_risk_level_display() {
        assert_eq!(RiskLevel::Medium.to_string(), "Medium");
        assert_eq!(RiskLevel::default(), RiskLevel::Medium);
    }

    #[test]
    fn test_record_deserializes_with_only_core_fields() {
        let stock: StockRecord = toml::from_str(
            r#"
symbol = "GOOG"
name = "Alphabet"
current_price = 2800.0
change = -3.5
"#,
        )
        .unwrap();
        assert_eq!(stock.symbol, "GOOG");
        assert_eq!(stock.volume, 0);
        assert!(stock.sector.is_empty());
    }
}

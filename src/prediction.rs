//! Display-only forecast figures derived from the current price.
//!
//! These are fixed multipliers, not a model. Confidence and risk are
//! placeholders shown as-is.

use crate::models::RiskLevel;
use serde::Serialize;

/// Multiplier for the 24 hour figure.
pub const DAY_MULTIPLIER: f64 = 1.023;

/// Multiplier for the 7 day figure.
pub const WEEK_MULTIPLIER: f64 = 1.087;

/// Confidence shown next to every prediction, in percent.
pub const CONFIDENCE_PERCENT: f64 = 78.5;

/// Forecast figures for one price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub day: f64,
    pub week: f64,
    pub confidence: f64,
    pub risk: RiskLevel,
}

impl Prediction {
    pub fn from_price(current_price: f64) -> Self {
        Self {
            day: current_price * DAY_MULTIPLIER,
            week: current_price * WEEK_MULTIPLIER,
            confidence: CONFIDENCE_PERCENT,
            risk: RiskLevel::Medium,
        }
    }

    pub fn day_display(&self) -> String {
        format_fixed(self.day)
    }

    pub fn week_display(&self) -> String {
        format_fixed(self.week)
    }

    pub fn confidence_display(&self) -> String {
        format!("{:.1}%", self.confidence)
    }
}

/// Format to two decimal places.
pub fn format_fixed(value: f64) -> String {
    format!("{:.2}", value)
}

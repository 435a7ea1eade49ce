//! Snapshot export in text, CSV and JSON.
//!
//! Useful for scripting and for screen readers.

use crate::cli::ExportFormat;
use crate::dashboard::Dashboard;
use crate::models::StockRecord;
use crate::prediction::Prediction;
use crate::simulator::Jitter;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    selection: &'a StockRecord,
    prediction: Prediction,
    watchlist: &'a [StockRecord],
    query: &'a str,
    search_results: &'a [StockRecord],
}

/// Export the dashboard state in the specified format.
pub fn export_snapshot<J: Jitter>(dashboard: &Dashboard<J>, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(export_text(dashboard)),
        ExportFormat::Csv => Ok(export_csv(dashboard)),
        ExportFormat::Json => export_json(dashboard),
    }
}

/// Export as plain text.
fn export_text<J: Jitter>(dashboard: &Dashboard<J>) -> String {
    let selection = dashboard.selection();
    let prediction = dashboard.prediction();
    let mut output = String::new();

    output.push_str("STONKDASH SNAPSHOT\n");
    output.push_str("==================\n\n");

    output.push_str(&format!("Selected: {} ({})\n", selection.symbol, selection.name));
    output.push_str(&format!("Price: ${:.2}\n", selection.current_price));
    output.push_str(&format!("Change: {:+.2}\n", selection.change));
    output.push_str(&format!("24h Prediction: ${}\n", prediction.day_display()));
    output.push_str(&format!("7d Prediction: ${}\n", prediction.week_display()));
    output.push_str(&format!("Confidence: {}\n", prediction.confidence_display()));
    output.push_str(&format!("Risk Level: {}\n\n", prediction.risk));

    output.push_str("Watchlist:\n");
    for stock in dashboard.watchlist() {
        output.push_str(&format!(
            "  {} {} ${:.2} {:+.2}\n",
            stock.symbol, stock.name, stock.current_price, stock.change
        ));
    }

    if !dashboard.query().is_empty() {
        output.push_str(&format!("\nSearch \"{}\":\n", dashboard.query()));
        if dashboard.search_results().is_empty() {
            output.push_str("  no matches\n");
        }
        for stock in dashboard.search_results() {
            output.push_str(&format!("  {} {}\n", stock.symbol, stock.name));
        }
    }

    output
}

/// Export as CSV, one row per stock with its role on the dashboard.
fn export_csv<J: Jitter>(dashboard: &Dashboard<J>) -> String {
    let mut output = String::new();

    output.push_str("Role,Symbol,Name,Price,Change,Change%,Volume,MarketCap\n");

    let rows = std::iter::once(("selected", dashboard.selection()))
        .chain(dashboard.watchlist().iter().map(|s| ("watchlist", s)))
        .chain(dashboard.search_results().iter().map(|s| ("result", s)));

    for (role, stock) in rows {
        let market_cap_str = stock
            .market_cap
            .map(|mc| mc.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        output.push_str(&format!(
            "{},\"{}\",\"{}\",{:.2},{:.2},{:.2},{},{}\n",
            role,
            stock.symbol,
            stock.name.replace('"', "\"\""),
            stock.current_price,
            stock.change,
            stock.change_percent,
            stock.volume,
            market_cap_str,
        ));
    }

    output
}

/// Export as pretty JSON.
fn export_json<J: Jitter>(dashboard: &Dashboard<J>) -> Result<String> {
    let snapshot = Snapshot {
        selection: dashboard.selection(),
        prediction: dashboard.prediction(),
        watchlist: dashboard.watchlist().entries(),
        query: dashboard.query(),
        search_results: dashboard.search_results(),
    };

    serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::simulator::tests::ScriptedJitter;

    fn dashboard() -> Dashboard<ScriptedJitter> {
        let catalog = Catalog::new(vec![
            StockRecord::new("AAPL", "Apple Inc.", 100.0, 1.0),
            StockRecord::new("GOOG", "Alphabet \"Google\" Inc.", 2800.0, -4.0),
            StockRecord::new("MSFT", "Microsoft Corporation", 300.0, 0.5),
        ])
        .unwrap();
        Dashboard::new(catalog, ScriptedJitter::new(&[0.0]), 10).unwrap()
    }

    #[test]
    fn test_export_text() {
        let mut d = dashboard();
        d.search("zzz");
        let text = export_snapshot(&d, ExportFormat::Text).unwrap();
        assert!(text.contains("Selected: AAPL (Apple Inc.)"));
        assert!(text.contains("24h Prediction: $102.30"));
        assert!(text.contains("7d Prediction: $108.70"));
        assert!(text.contains("Confidence: 78.5%"));
        assert!(text.contains("Risk Level: Medium"));
        assert!(text.contains("no matches"));
    }

    #[test]
    fn test_export_csv() {
        let mut d = dashboard();
        d.search("goo");
        let csv = export_snapshot(&d, ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Role,Symbol,Name,Price,Change,Change%,Volume,MarketCap");
        assert!(lines[1].starts_with("selected,\"AAPL\""));
        assert_eq!(lines.iter().filter(|l| l.starts_with("watchlist,")).count(), 3);
        assert!(lines[5].starts_with("result,\"GOOG\""));
        assert!(lines[5].contains("Alphabet \"\"Google\"\" Inc."));
    }

    #[test]
    fn test_export_json() {
        let mut d = dashboard();
        d.search("micro");
        let json = export_snapshot(&d, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["selection"]["symbol"], "AAPL");
        assert_eq!(value["watchlist"].as_array().unwrap().len(), 3);
        assert_eq!(value["searchResults"][0]["symbol"], "MSFT");
        assert_eq!(value["query"], "micro");
        assert_eq!(value["prediction"]["risk"], "Medium");
    }
}

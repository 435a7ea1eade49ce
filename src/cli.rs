//! Command-line interface.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// A terminal stock dashboard with a searchable watchlist and simulated live prices.
///
/// Stonkdash shows a selected stock with derived predictions, a watchlist,
/// search over a fixed catalog, a market overview and a price chart. Prices
/// of the selected stock drift every few seconds to mimic a live feed.
#[derive(Parser, Debug, Clone)]
#[command(name = "stonkdash")]
#[command(author = "Thomas Vincent")]
#[command(version)]
#[command(about = "A terminal stock dashboard with simulated live prices", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "STONKDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write a sample config to the default location and exit
    #[arg(long)]
    pub init_config: bool,

    /// Batch mode - print plain text frames instead of the TUI
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// Number of frames before exiting in batch mode
    ///
    /// 0 means infinite
    #[arg(short = 'n', long, default_value = "0")]
    pub iterations: u64,

    /// Stock to select at startup instead of the first catalog entry
    #[arg(long, env = "STONKDASH_SELECT")]
    pub select: Option<String>,

    /// Extra symbols to add to the watchlist (comma-separated)
    #[arg(short = 'w', long, value_delimiter = ',', env = "STONKDASH_WATCH")]
    pub watch: Option<Vec<String>>,

    /// Initial search query
    #[arg(long)]
    pub search: Option<String>,

    /// Seed the price simulator for reproducible runs
    #[arg(long, env = "STONKDASH_SEED")]
    pub seed: Option<u64>,

    /// Print one snapshot in the given format and exit
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Hide the price chart
    #[arg(long)]
    pub no_chart: bool,

    /// Verbose output - print startup diagnostics to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Export format for snapshot output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Plain text format
    Text,
    /// Comma-separated values (CSV)
    Csv,
    /// JavaScript Object Notation (JSON)
    Json,
}

impl Args {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["stonkdash"]);
        assert_eq!(args.iterations, 0);
        assert!(!args.batch);
        assert!(args.export.is_none());
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_watch_parsing() {
        let args = Args::parse_from(["stonkdash", "-w", "NVDA,TSLA"]);
        assert_eq!(
            args.watch,
            Some(vec!["NVDA".to_string(), "TSLA".to_string()])
        );
    }

    #[test]
    fn test_batch_options() {
        let args = Args::parse_from([
            "stonkdash", "-b", "-n", "3", "--seed", "42", "--search", "goo", "--select", "MSFT",
        ]);
        assert!(args.batch);
        assert_eq!(args.iterations, 3);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.search.as_deref(), Some("goo"));
        assert_eq!(args.select.as_deref(), Some("MSFT"));
    }

    #[test]
    fn test_export_format() {
        let args = Args::parse_from(["stonkdash", "--export", "json"]);
        assert_eq!(args.export, Some(ExportFormat::Json));
    }
}

//! Configuration file handling with TOML support.

use crate::catalog::{self, Catalog};
use crate::dashboard::DEFAULT_HISTORY_LEN;
use crate::models::{MarketIndex, StockRecord};
use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Color scheme
    #[serde(default)]
    pub colors: ColorConfig,

    /// Stock catalog; the built-in dataset is used when absent
    #[serde(default)]
    pub catalog: Option<Vec<StockRecord>>,

    /// Market overview rows; the built-in indices are used when empty
    #[serde(default)]
    pub markets: Vec<MarketIndex>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of price points kept for the chart
    #[serde(default = "default_history_len")]
    pub history_len: usize,

    /// Seed for the price simulator
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            history_len: default_history_len(),
            seed: None,
        }
    }
}

fn default_history_len() -> usize {
    DEFAULT_HISTORY_LEN
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show the prediction summary
    #[serde(default = "default_true")]
    pub show_predictions: bool,

    /// Show the price chart
    #[serde(default = "default_true")]
    pub show_chart: bool,

    /// Show the market overview
    #[serde(default = "default_true")]
    pub show_market_overview: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_predictions: true,
            show_chart: true,
            show_market_overview: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Color configuration using hex codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Color for positive changes
    #[serde(default = "default_gain_color")]
    pub gain: String,

    /// Color for negative changes
    #[serde(default = "default_loss_color")]
    pub loss: String,

    /// Color for neutral/unchanged
    #[serde(default = "default_neutral_color")]
    pub neutral: String,

    /// Header background color
    #[serde(default = "default_header_color")]
    pub header: String,

    /// Border color
    #[serde(default = "default_border_color")]
    pub border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            gain: default_gain_color(),
            loss: default_loss_color(),
            neutral: default_neutral_color(),
            header: default_header_color(),
            border: default_border_color(),
        }
    }
}

fn default_gain_color() -> String {
    "#00ff00".to_string()
}
fn default_loss_color() -> String {
    "#ff0000".to_string()
}
fn default_neutral_color() -> String {
    "#ffffff".to_string()
}
fn default_header_color() -> String {
    "#1e90ff".to_string()
}
fn default_border_color() -> String {
    "#444444".to_string()
}

/// Parse a configured color, falling back when the value is not understood.
pub fn parse_color(value: &str, fallback: Color) -> Color {
    Color::from_str(value).unwrap_or(fallback)
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from default location or create default.
    pub fn load_or_default() -> Self {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to load config: {:#}", e);
                    }
                }
            }
        }
        Config::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stonkdash").join("config.toml"))
    }

    /// Write the sample configuration to `path`, refusing to overwrite.
    pub fn write_sample(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, sample_config())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Build the catalog from the configured stocks or the built-in dataset.
    ///
    /// `catalog = []` yields an empty catalog, which the dashboard refuses.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            None => Ok(Catalog::builtin()),
            Some(records) => {
                Catalog::new(records.clone()).context("Invalid stock catalog in config")
            }
        }
    }

    /// Market overview rows from config or the built-in indices.
    pub fn markets(&self) -> Vec<MarketIndex> {
        if self.markets.is_empty() {
            catalog::builtin_markets()
        } else {
            self.markets.clone()
        }
    }
}

/// Generate a sample configuration file content.
pub fn sample_config() -> &'static str {
    r##"# Stonkdash Configuration File
# A terminal stock dashboard with simulated live prices

[general]
# Price points kept for the chart
history_len = 60
# Seed for the price simulator (omit for a random seed)
# seed = 42

[display]
show_predictions = true
show_chart = true
show_market_overview = true

[colors]
# Colors in hex format
gain = "#00ff00"
loss = "#ff0000"
neutral = "#ffffff"
header = "#1e90ff"
border = "#444444"

# Stock catalog (optional, replaces the built-in dataset).
# The first entry is selected at startup and the first three are
# pinned to the watchlist.
[[catalog]]
symbol = "AAPL"
name = "Apple Inc."
current_price = 189.84
change = 2.31
change_percent = 1.23
volume = 52164300
market_cap = 2950000000000
sector = "Technology"

[[catalog]]
symbol = "GOOGL"
name = "Alphabet Inc."
current_price = 141.80
change = -0.92

[[catalog]]
symbol = "MSFT"
name = "Microsoft Corporation"
current_price = 378.91
change = 4.17

# Market overview rows (optional)
[[markets]]
name = "S&P 500"
value = 4783.45
change_percent = 0.42

[[markets]]
name = "NASDAQ"
value = 15011.35
change_percent = 0.78
"##
}

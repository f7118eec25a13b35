// In crates/analytics/src/types.rs

use std::fmt;

use core_types::{PriceSeries, Ticker};
use serde::Serialize;

/// The categorical signal derived from comparing price to its long-run average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    /// The latest price is strictly below the window average.
    Buy,
    /// The latest price is at or above the window average.
    Avoid,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Avoid => "AVOID",
        }
    }

    /// Human-readable summary for a given window length in weeks.
    pub fn summary(&self, window: usize) -> String {
        match self {
            Recommendation::Buy => {
                format!("Good to buy: price is below the {}-week average", window)
            }
            Recommendation::Avoid => {
                format!("Do not buy: price is at or above the {}-week average", window)
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one moving-average analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub window_average: f64,
    pub latest_price: f64,
    pub deviation_pct: f64,
    pub recommendation: Recommendation,
}

/// Parameters for building a `TickerReport`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportParams {
    /// Number of weekly periods to average.
    pub window: usize,
    /// How many calendar days of daily closes to keep for the daily chart.
    pub daily_chart_days: i64,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            window: 200,
            daily_chart_days: 365,
        }
    }
}

/// Everything the presentation layer needs to render one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerReport {
    pub ticker: Ticker,
    pub window: usize,
    pub weeks_available: usize,
    pub weeks_used: usize,
    pub analysis: AnalysisResult,
    pub summary: String,
    pub weekly: PriceSeries,
    pub daily: PriceSeries,
}

// In crates/web-server/src/types.rs

use serde::{Deserialize, Serialize};

/// The body of the ticker entry form (`POST /`).
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub ticker: String,
}

/// The query parameters of a watchlist screen (e.g., `?q=HDFC`).
#[derive(Debug, Deserialize)]
pub struct ScreenParams {
    /// Symbol prefix filter. Empty keeps every symbol.
    #[serde(default)]
    pub q: String,
}

/// One row of a watchlist screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenEntry {
    pub symbol: String,
    pub price: Option<f64>,
    /// Absent when the symbol has fewer weeks of history than the window.
    pub window_average: Option<f64>,
    pub status: ScreenStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenStatus {
    Success,
    NoData,
    Error(String),
}

// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    pub server: ServerSettings,
    /// Settings for the upstream market-data API.
    pub market_data: MarketDataSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarketDataSettings {
    /// Base URL of the chart API (e.g., "https://query1.finance.yahoo.com").
    pub base_url: String,
    /// Sent with every request; the upstream rejects requests without one.
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Number of weekly periods in the moving average.
    #[serde(default = "default_window_weeks")]
    pub window_weeks: usize,
    /// How far back to fetch daily history, in weeks.
    #[serde(default = "default_lookback_weeks")]
    pub lookback_weeks: i64,
    /// Calendar days of daily closes shown on the daily chart.
    #[serde(default = "default_daily_chart_days")]
    pub daily_chart_days: i64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window_weeks: default_window_weeks(),
            lookback_weeks: default_lookback_weeks(),
            daily_chart_days: default_daily_chart_days(),
        }
    }
}

// --- Structs for watchlists.toml ---

/// All configured watchlists.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Watchlists {
    #[serde(default)]
    pub watchlists: Vec<Watchlist>,
}

impl Watchlists {
    /// Looks up a watchlist by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Watchlist> {
        self.watchlists.iter().find(|w| w.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.watchlists.iter().map(|w| w.name.as_str()).collect()
    }
}

/// A named list of symbols listed on the same exchange.
#[derive(Deserialize, Debug, Clone)]
pub struct Watchlist {
    pub name: String,
    /// Appended to every symbol before fetching (e.g., ".NS" for NSE).
    #[serde(default)]
    pub exchange_suffix: String,
    pub symbols: Vec<String>,
}

impl Watchlist {
    /// Symbols starting with `query`, ignoring case. An empty query keeps all.
    pub fn matching(&self, query: &str) -> Vec<&str> {
        let prefix = query.trim().to_ascii_uppercase();
        self.symbols
            .iter()
            .map(String::as_str)
            .filter(|s| s.to_ascii_uppercase().starts_with(&prefix))
            .collect()
    }
}

/// Helper functions for serde defaults
fn default_timeout_secs() -> u64 { 15 }
fn default_window_weeks() -> usize { 200 }
fn default_lookback_weeks() -> i64 { 220 }
fn default_daily_chart_days() -> i64 { 365 }

// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{
    AnalysisSettings, AppSettings, MarketDataSettings, ServerSettings, Settings, Watchlist,
    Watchlists,
};

const WATCHLISTS_PATH: &str = "config/watchlists.toml";

/// Upper bound on `analysis.lookback_weeks` (about 100 years).
pub const MAX_LOOKBACK_WEEKS: i64 = 5_218;
/// Upper bound on `analysis.daily_chart_days` (100 years).
pub const MAX_DAILY_CHART_DAYS: i64 = 36_525;

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name("config/base"))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&format!("config/{}", environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP_SERVER__PORT=8080`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    validate(&settings)?;

    Ok(settings)
}

/// Rejects settings the analysis cannot run with.
pub fn validate(settings: &Settings) -> Result<()> {
    let analysis = &settings.analysis;
    if analysis.window_weeks == 0 {
        return Err(Error::Invalid("analysis.window_weeks must be positive".into()));
    }
    if analysis.lookback_weeks < analysis.window_weeks as i64 {
        return Err(Error::Invalid(format!(
            "analysis.lookback_weeks ({}) must cover analysis.window_weeks ({})",
            analysis.lookback_weeks, analysis.window_weeks
        )));
    }
    if analysis.lookback_weeks > MAX_LOOKBACK_WEEKS {
        return Err(Error::Invalid(format!(
            "analysis.lookback_weeks ({}) must not exceed {}",
            analysis.lookback_weeks, MAX_LOOKBACK_WEEKS
        )));
    }
    if analysis.daily_chart_days <= 0 {
        return Err(Error::Invalid("analysis.daily_chart_days must be positive".into()));
    }
    if analysis.daily_chart_days > MAX_DAILY_CHART_DAYS {
        return Err(Error::Invalid(format!(
            "analysis.daily_chart_days ({}) must not exceed {}",
            analysis.daily_chart_days, MAX_DAILY_CHART_DAYS
        )));
    }
    Ok(())
}

/// Loads the watchlists from `config/watchlists.toml`.
///
/// A missing file means no watchlists are configured.
pub fn load_watchlists() -> Result<Watchlists> {
    match std::fs::read_to_string(WATCHLISTS_PATH) {
        Ok(content) => parse_watchlists(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Watchlists::default()),
        Err(e) => Err(e.into()),
    }
}

pub fn parse_watchlists(content: &str) -> Result<Watchlists> {
    let watchlists: Watchlists = toml::from_str(content)?;
    Ok(watchlists)
}

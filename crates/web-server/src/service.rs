// In crates/web-server/src/service.rs

use analytics::{ReportParams, TickerReport, analyze, build_report, resample_weekly};
use api_client::HistorySource;
use app_config::{AnalysisSettings, Watchlist};
use chrono::Duration;
use core_types::{Error, Result, Ticker};

use crate::types::{ScreenEntry, ScreenStatus};

/// Runs a full analysis for one ticker: validate, fetch once, analyze.
///
/// Errors from the source are returned unchanged.
pub async fn analyze_ticker(
    source: &dyn HistorySource,
    settings: &AnalysisSettings,
    raw_ticker: &str,
) -> Result<TickerReport> {
    let ticker = Ticker::parse(raw_ticker)?;
    tracing::info!(ticker = %ticker, source = source.name(), "Analyzing ticker.");

    let daily = source.fetch_daily_history(&ticker, lookback(settings)?).await?;

    let report = build_report(ticker, daily, &report_params(settings))?;
    tracing::info!(
        ticker = %report.ticker,
        average = report.analysis.window_average,
        latest = report.analysis.latest_price,
        recommendation = %report.analysis.recommendation,
        "Analysis complete."
    );

    Ok(report)
}

/// Screens the watchlist symbols that start with `query`, one fetch per symbol.
///
/// A failing symbol is reported in its own row and never aborts the screen.
pub async fn screen_watchlist(
    source: &dyn HistorySource,
    settings: &AnalysisSettings,
    watchlist: &Watchlist,
    query: &str,
) -> Vec<ScreenEntry> {
    let symbols = watchlist.matching(query);
    tracing::info!(
        watchlist = %watchlist.name,
        query,
        symbols = symbols.len(),
        "Screening watchlist."
    );

    let mut entries = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        entries.push(screen_symbol(source, settings, symbol, &watchlist.exchange_suffix).await);
    }
    entries
}

async fn screen_symbol(
    source: &dyn HistorySource,
    settings: &AnalysisSettings,
    symbol: &str,
    suffix: &str,
) -> ScreenEntry {
    let entry = |price, window_average, status| ScreenEntry {
        symbol: symbol.to_string(),
        price,
        window_average,
        status,
    };

    let ticker = match Ticker::parse(symbol).and_then(|t| t.with_suffix(suffix)) {
        Ok(ticker) => ticker,
        Err(e) => return entry(None, None, ScreenStatus::Error(e.to_string())),
    };

    let lookback = match lookback(settings) {
        Ok(lookback) => lookback,
        Err(e) => return entry(None, None, ScreenStatus::Error(e.to_string())),
    };

    let daily = match source.fetch_daily_history(&ticker, lookback).await {
        Ok(daily) => daily,
        Err(Error::DataUnavailable { .. }) => return entry(None, None, ScreenStatus::NoData),
        Err(e) => return entry(None, None, ScreenStatus::Error(e.to_string())),
    };

    let Some(latest) = daily.last() else {
        return entry(None, None, ScreenStatus::NoData);
    };

    let window_average = match analyze(&resample_weekly(&daily), settings.window_weeks) {
        Ok(result) => Some(result.window_average),
        Err(e) => {
            tracing::debug!(ticker = %ticker, error = %e, "No window average for symbol.");
            None
        }
    };

    entry(Some(latest.close), window_average, ScreenStatus::Success)
}

fn lookback(settings: &AnalysisSettings) -> Result<Duration> {
    Duration::try_weeks(settings.lookback_weeks).ok_or_else(|| {
        Error::InvalidInput(format!(
            "lookback of {} weeks is out of range",
            settings.lookback_weeks
        ))
    })
}

pub fn report_params(settings: &AnalysisSettings) -> ReportParams {
    ReportParams {
        window: settings.window_weeks,
        daily_chart_days: settings.daily_chart_days,
    }
}

// In crates/analytics/src/report.rs

use chrono::{Duration, NaiveDate};
use core_types::{Error, PriceSeries, Result, Ticker};

use crate::engine::analyze;
use crate::resample::resample_weekly;
use crate::types::{ReportParams, TickerReport};

/// Builds the full report for one ticker from its daily history.
///
/// Resamples to weeks, runs the moving-average analysis, and trims the daily
/// history down to the chart period. No I/O.
pub fn build_report(ticker: Ticker, daily: PriceSeries, params: &ReportParams) -> Result<TickerReport> {
    let weekly = resample_weekly(&daily);
    let analysis = analyze(&weekly, params.window)?;

    let daily_chart = match daily.last() {
        Some(last) => daily.since(chart_start(last.date, params.daily_chart_days)?),
        None => PriceSeries::empty(),
    };

    Ok(TickerReport {
        summary: analysis.recommendation.summary(params.window),
        weeks_available: weekly.len(),
        weeks_used: weekly.len().min(params.window),
        window: params.window,
        ticker,
        analysis,
        weekly,
        daily: daily_chart,
    })
}

fn chart_start(last: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|period| last.checked_sub_signed(period))
        .ok_or_else(|| Error::InvalidInput(format!("daily chart period of {} days is out of range", days)))
}

// In crates/api-client/src/lib.rs

use std::time::Duration as StdDuration;

use app_config::MarketDataSettings;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use core_types::{PricePoint, PriceSeries, Ticker};

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// The universal interface for a source of historical prices.
///
/// A `HistorySource` turns a ticker and a lookback period into a daily
/// closing-price series. Implementations make exactly one upstream attempt
/// and report any failure as `DataUnavailable`.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// The name of the source (e.g., "YahooFinance").
    fn name(&self) -> &'static str;

    /// Fetches daily closes for `ticker` covering the last `lookback`.
    async fn fetch_daily_history(
        &self,
        ticker: &Ticker,
        lookback: Duration,
    ) -> core_types::Result<PriceSeries>;
}

impl YahooClient {
    /// Constructs a new YahooClient from MarketDataSettings.
    pub fn new(settings: &MarketDataSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(StdDuration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(YahooClient {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches daily chart data for the given time range.
    ///
    /// This corresponds to the `GET /v8/finance/chart/{symbol}` endpoint.
    pub async fn get_daily_chart(
        &self,
        ticker: &Ticker,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,split".to_string()),
            ])
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::RequestFailed)?;

        if !status.is_success() {
            // The chart API explains most failures (e.g., unknown symbol) in the body.
            if let Ok(ChartResponse { chart: Chart { error: Some(err), .. } }) =
                serde_json::from_str::<ChartResponse>(&body)
            {
                return Err(Error::ApiError {
                    code: err.code,
                    msg: err.description,
                });
            }
            return Err(Error::HttpStatus(status.as_u16()));
        }

        decode_chart(&body)
    }
}

#[async_trait]
impl HistorySource for YahooClient {
    fn name(&self) -> &'static str {
        "YahooFinance"
    }

    async fn fetch_daily_history(
        &self,
        ticker: &Ticker,
        lookback: Duration,
    ) -> core_types::Result<PriceSeries> {
        let end = Utc::now();
        let start = end
            .checked_sub_signed(lookback)
            .ok_or(Error::LookbackOutOfRange)
            .map_err(|e| e.into_domain(ticker))?;

        tracing::debug!(ticker = %ticker, %start, %end, "Fetching daily history.");

        match self.get_daily_chart(ticker, start, end).await {
            Ok(series) => {
                tracing::info!(ticker = %ticker, points = series.len(), "Received daily history.");
                Ok(series)
            }
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "Daily history fetch failed.");
                Err(e.into_domain(ticker))
            }
        }
    }
}

/// Decodes a chart API body into a daily closing-price series.
///
/// Adjusted closes are used when present, raw closes otherwise. Rows with a
/// missing price are dropped, and dates are taken in the exchange's local time.
pub fn decode_chart(body: &str) -> Result<PriceSeries> {
    let response: ChartResponse = serde_json::from_str(body).map_err(Error::DeserializationFailed)?;

    if let Some(err) = response.chart.error {
        return Err(Error::ApiError {
            code: err.code,
            msg: err.description,
        });
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or(Error::EmptyResult)?;

    let adjusted = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|closes| closes.iter().any(Option::is_some));
    let closes = match adjusted {
        Some(closes) => closes,
        None => result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default(),
    };

    if closes.len() != result.timestamp.len() {
        tracing::warn!(
            timestamps = result.timestamp.len(),
            closes = closes.len(),
            "Chart close column does not match the timestamps; unmatched rows are dropped."
        );
    }

    let offset = result.meta.gmtoffset;
    let points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close?;
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PricePoint::new(date, close))
        })
        .collect();

    if points.is_empty() {
        return Err(Error::EmptyResult);
    }

    Ok(PriceSeries::from_unordered(points))
}

// Free function to allow api_client::new usage
pub fn new(settings: &MarketDataSettings) -> Result<YahooClient> {
    YahooClient::new(settings)
}

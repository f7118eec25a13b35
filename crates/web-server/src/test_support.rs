// In crates/web-server/src/test_support.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use api_client::HistorySource;
use app_config::{AnalysisSettings, AppSettings, MarketDataSettings, ServerSettings, Settings, Watchlist, Watchlists};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use core_types::{Error, PricePoint, PriceSeries, Result, Ticker};

/// A `HistorySource` that returns a canned result and counts fetches.
pub struct StubSource {
    result: Option<Result<PriceSeries>>,
    calls: Arc<AtomicUsize>,
}

impl StubSource {
    pub fn with_result(result: Result<PriceSeries>) -> Self {
        Self {
            result: Some(result),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// `weeks` consecutive Friday closes at `price`.
    pub fn flat(weeks: usize, price: f64) -> Self {
        let first = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let points = (0..weeks)
            .map(|i| PricePoint::new(first + Duration::weeks(i as i64), price))
            .collect();
        Self::with_result(Ok(PriceSeries::new(points).unwrap()))
    }

    /// Fails every fetch with `DataUnavailable` for the requested ticker.
    pub fn unavailable() -> Self {
        Self {
            result: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl HistorySource for StubSource {
    fn name(&self) -> &'static str {
        "Stub"
    }

    async fn fetch_daily_history(&self, ticker: &Ticker, _lookback: Duration) -> Result<PriceSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Some(result) => result.clone(),
            None => Err(Error::DataUnavailable {
                ticker: ticker.to_string(),
                reason: "no price data returned".into(),
            }),
        }
    }
}

pub fn settings() -> Settings {
    Settings {
        app: AppSettings {
            environment: "test".into(),
            log_level: "debug".into(),
        },
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        market_data: MarketDataSettings {
            base_url: "http://127.0.0.1:9".into(),
            user_agent: "test".into(),
            timeout_secs: 1,
        },
        analysis: AnalysisSettings::default(),
    }
}

pub fn watchlists() -> Watchlists {
    Watchlists {
        watchlists: vec![Watchlist {
            name: "fno".into(),
            exchange_suffix: ".NS".into(),
            symbols: vec!["HDFCBANK".into(), "HDFCLIFE".into(), "INFY".into()],
        }],
    }
}

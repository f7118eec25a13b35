// In crates/core-types/src/types.rs

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MAX_TICKER_LEN: usize = 20;

/// A validated exchange symbol (e.g., "AAPL", "RELIANCE.NS", "^NSEI").
///
/// Always trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Parses raw user input into a `Ticker`.
    ///
    /// Accepts ASCII letters, digits and the separators `. - ^ = &`,
    /// which covers share classes (`BRK-B`), exchange suffixes (`TCS.NS`),
    /// indices (`^NSEI`), currency pairs (`EURUSD=X`) and NSE names like `M&M`.
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = raw.trim().to_ascii_uppercase();

        if symbol.is_empty() {
            return Err(Error::InvalidInput("ticker symbol is empty".into()));
        }
        if symbol.len() > MAX_TICKER_LEN {
            return Err(Error::InvalidInput(format!(
                "ticker symbol '{}' is longer than {} characters",
                symbol, MAX_TICKER_LEN
            )));
        }
        if let Some(bad) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '&')))
        {
            return Err(Error::InvalidInput(format!(
                "ticker symbol '{}' contains invalid character '{}'",
                symbol, bad
            )));
        }
        if !symbol.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidInput(format!(
                "ticker symbol '{}' has no letters or digits",
                symbol
            )));
        }

        Ok(Self(symbol))
    }

    /// Returns a new ticker with an exchange suffix appended (e.g., ".NS").
    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        Self::parse(&format!("{}{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single closing price on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// An ordered price history: dates are unique and strictly ascending.
///
/// A series is built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, rejecting points that are not strictly ascending by date.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(Error::InvalidInput(format!(
                "price series is not strictly ascending: {} follows {}",
                pair[1].date, pair[0].date
            )));
        }
        Ok(Self { points })
    }

    /// Builds a series from points in any order.
    ///
    /// Points are sorted by date; when a date repeats, the point that came
    /// last in the input wins.
    pub fn from_unordered(mut points: Vec<PricePoint>) -> Self {
        // Stable sort keeps input order within a date, so the last duplicate is the latest one.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The most recent `n` points (or all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Points dated on or after `date`, as a new series.
    pub fn since(&self, date: NaiveDate) -> Self {
        let start = self.points.partition_point(|p| p.date < date);
        Self {
            points: self.points[start..].to_vec(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ticker_is_trimmed_and_uppercased() {
        let ticker = Ticker::parse("  aapl \n").unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(ticker.to_string(), "AAPL");
    }

    #[test]
    fn ticker_accepts_exchange_style_symbols() {
        for raw in ["BRK-B", "reliance.ns", "^NSEI", "EURUSD=X", "M&M", "BAJAJ-AUTO"] {
            assert!(Ticker::parse(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn ticker_rejects_malformed_input() {
        for raw in ["", "   ", "AA PL", "<script>", "A/B", "^^^", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"] {
            assert!(
                matches!(Ticker::parse(raw), Err(Error::InvalidInput(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn ticker_with_suffix() {
        let ticker = Ticker::parse("infy").unwrap().with_suffix(".NS").unwrap();
        assert_eq!(ticker.as_str(), "INFY.NS");
    }

    #[test]
    fn series_rejects_unordered_or_duplicate_dates() {
        let unordered = vec![
            PricePoint::new(day(2024, 1, 3), 10.0),
            PricePoint::new(day(2024, 1, 2), 11.0),
        ];
        assert!(matches!(PriceSeries::new(unordered), Err(Error::InvalidInput(_))));

        let duplicate = vec![
            PricePoint::new(day(2024, 1, 2), 10.0),
            PricePoint::new(day(2024, 1, 2), 11.0),
        ];
        assert!(matches!(PriceSeries::new(duplicate), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn from_unordered_sorts_and_keeps_last_duplicate() {
        let series = PriceSeries::from_unordered(vec![
            PricePoint::new(day(2024, 1, 4), 3.0),
            PricePoint::new(day(2024, 1, 2), 1.0),
            PricePoint::new(day(2024, 1, 4), 4.0),
        ]);
        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![1.0, 4.0]);
    }

    #[test]
    fn tail_and_since_slice_the_end_of_the_series() {
        let series = PriceSeries::new(
            (1..=5).map(|d| PricePoint::new(day(2024, 3, d), d as f64)).collect(),
        )
        .unwrap();

        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(2)[0].close, 4.0);
        assert_eq!(series.tail(10).len(), 5);

        let recent = series.since(day(2024, 3, 4));
        assert_eq!(recent.len(), 2);
        assert_eq!(recent.first().unwrap().close, 4.0);
    }

    #[test]
    fn series_serializes_as_plain_array() {
        let series = PriceSeries::new(vec![PricePoint::new(day(2024, 1, 2), 1.5)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"date":"2024-01-02","close":1.5}]"#);
    }
}

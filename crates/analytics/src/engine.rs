// In crates/analytics/src/engine.rs

use core_types::{Error, PriceSeries, Result};

use crate::types::{AnalysisResult, Recommendation};

/// Computes the trailing simple moving average of `series` and compares the
/// latest close against it.
///
/// Fails with `InvalidInput` for a zero window or any non-finite/non-positive
/// close, and with `InsufficientData` when the series holds fewer than
/// `window` points (an empty series included).
pub fn analyze(series: &PriceSeries, window: usize) -> Result<AnalysisResult> {
    if window == 0 {
        return Err(Error::InvalidInput("window must be a positive number of periods".into()));
    }

    if let Some(bad) = series.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
        return Err(Error::InvalidInput(format!(
            "closing price on {} is not a positive number: {}",
            bad.date, bad.close
        )));
    }

    let found = series.len();
    if found < window {
        return Err(Error::InsufficientData {
            found,
            required: window,
        });
    }

    let trailing = series.tail(window);
    let window_average = trailing.iter().map(|p| p.close).sum::<f64>() / window as f64;

    // `found >= window >= 1`, so the series has a last point.
    let latest_price = trailing[trailing.len() - 1].close;
    let deviation_pct = (latest_price - window_average) / window_average * 100.0;

    // Strict comparison: a tie is not a discount.
    let recommendation = if latest_price < window_average {
        Recommendation::Buy
    } else {
        Recommendation::Avoid
    };

    Ok(AnalysisResult {
        window_average,
        latest_price,
        deviation_pct,
        recommendation,
    })
}

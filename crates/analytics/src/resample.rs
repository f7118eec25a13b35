// In crates/analytics/src/resample.rs

use chrono::{Datelike, Duration, NaiveDate};
use core_types::{PricePoint, PriceSeries};

/// The Monday that starts the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Reduces a daily series to one point per ISO calendar week.
///
/// Each point is dated at its week's Monday and carries the close of the last
/// trading day in that week. Weeks without trading days produce no point, and
/// a partial trailing week is kept as its own bucket.
pub fn resample_weekly(daily: &PriceSeries) -> PriceSeries {
    let mut weekly: Vec<PricePoint> = Vec::new();

    // Input is ascending, so each week's days arrive contiguously and the
    // last one seen wins.
    for point in daily {
        let start = week_start(point.date);
        match weekly.last_mut() {
            Some(bucket) if bucket.date == start => bucket.close = point.close,
            _ => weekly.push(PricePoint::new(start, point.close)),
        }
    }

    tracing::debug!(
        daily_points = daily.len(),
        weekly_points = weekly.len(),
        "Resampled daily series to weekly buckets."
    );

    PriceSeries::from_unordered(weekly)
}

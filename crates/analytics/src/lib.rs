// In crates/analytics/src/lib.rs

pub mod engine;
pub mod report;
pub mod resample;
pub mod types;

// Re-export the calculation entry points.
pub use engine::analyze;
pub use report::build_report;
pub use resample::resample_weekly;
pub use types::{AnalysisResult, Recommendation, ReportParams, TickerReport};

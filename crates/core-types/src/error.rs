// In crates/core-types/src/error.rs

use thiserror::Error;

/// The domain error shared by every crate that touches a price series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient data: found {found} weekly periods, {required} required")]
    InsufficientData { found: usize, required: usize },

    /// Upstream fetch failed or came back empty. Annotated with the ticker,
    /// never re-wrapped.
    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

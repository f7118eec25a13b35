// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: {code}: {msg}")]
    ApiError { code: String, msg: String },
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    #[error("no price data returned")]
    EmptyResult,
    #[error("lookback period is out of range")]
    LookbackOutOfRange,
}

impl Error {
    /// Converts this client failure into the domain error, annotated with the ticker.
    pub fn into_domain(self, ticker: &core_types::Ticker) -> core_types::Error {
        core_types::Error::DataUnavailable {
            ticker: ticker.to_string(),
            reason: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

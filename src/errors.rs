use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Exchange returned status {0}")]
    Status(u16),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected data from exchange: {0}")]
    UnexpectedData(String),
}

/// Rejected at the settings boundary, never seen by the pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown volume threshold: {0:?} (expected one of 250M, 500M, 1B, 2B, 5B)")]
    UnknownThreshold(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("failed to launch URL opener: {0}")]
    Open(#[from] std::io::Error),
}

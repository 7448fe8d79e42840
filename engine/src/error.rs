use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("JSON decode error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("HTTP transport error: {source}")]
    TransportError {
        #[from]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} from {url}. Response body: {body}")]
    HttpError {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Market data provider error: {0}")]
    ProviderError(String),

    #[error("Market data store error: {0}")]
    MarketDataError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

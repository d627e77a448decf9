use thiserror::Error;

/// Errors raised while building or dispatching a query document
#[derive(Debug, Error)]
pub enum Error {
    /// Connection or HTTP-level failure, passed through untouched
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to encode query document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("cutoff out of range: {amount} {unit} before {now}")]
    CutoffOutOfRange {
        amount: u32,
        unit: &'static str,
        now: String,
    },
}

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

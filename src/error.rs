//! Error types for dashlens

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed filter array: {0}")]
    MalformedFilter(String),

    #[error("Malformed filter string: {0}")]
    MalformedFilterString(String),

    #[error("Unsupported filter value: {0}")]
    UnsupportedValue(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn malformed_filter(msg: impl Into<String>) -> Self {
        Error::MalformedFilter(msg.into())
    }

    pub fn malformed_filter_string(msg: impl Into<String>) -> Self {
        Error::MalformedFilterString(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

use thiserror::Error;

/// Top-level error type for Tollgate.
///
/// The admission path itself never fails. These variants cover configuration,
/// construction preconditions, file I/O and binding the HTTP server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TollgateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bucket capacity must be greater than zero")]
    InvalidCapacity,

    #[error("Invalid refill settings: {0}")]
    InvalidRefill(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(String),
}

impl From<toml::de::Error> for TollgateError {
    fn from(err: toml::de::Error) -> Self {
        TollgateError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TollgateError {
    fn from(err: toml::ser::Error) -> Self {
        TollgateError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Tollgate operations.
pub type Result<T> = std::result::Result<T, TollgateError>;

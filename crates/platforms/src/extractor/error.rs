use thiserror::Error;

use super::dispatcher::Platform;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid input: {0}")]
    ValidationError(String),
    #[error("missing credential: {0}")]
    ConfigurationError(String),
    #[error("upstream error: {0}")]
    UpstreamError(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("unexpected page structure: {0}")]
    ParseError(String),
    #[error("{0} is not implemented")]
    NotImplemented(Platform),
    #[error("unsupported platform")]
    PlatformNotSupported,
}

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed proxy string or malformed API response.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported proxy type: {0}")]
    UnsupportedProxyType(String),

    /// Transport failure, client construction failure or non-2xx status.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("startup failed: {0}")]
    Startup(String),
}

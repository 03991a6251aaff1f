//! Error types for the League API

use thiserror::Error;

/// Errors that can occur while serving league data
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Malformed upstream data: {0}")]
    Malformed(String),
}

/// Result type for League API operations
pub type ApiResult<T> = Result<T, ApiError>;

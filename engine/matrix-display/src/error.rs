//! Error types for the Matrix Display

use thiserror::Error;

/// Errors that can occur while fetching or drawing
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {0}")]
    BadStatus(u16),

    #[error("Malformed snapshot: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Matrix Display operations
pub type DisplayResult<T> = Result<T, DisplayError>;

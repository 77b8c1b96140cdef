//! Error types for traceline

use thiserror::Error;

/// Result type alias for traceline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for traceline operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model endpoint error
    #[error("Model endpoint error: {0}")]
    Gateway(#[from] traceline_llm::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

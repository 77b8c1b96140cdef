//! Error types for model endpoint operations

use thiserror::Error;

/// Result type for model endpoint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the completions endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be parsed
    #[error("Invalid endpoint URL: {0}")]
    Endpoint(String),

    /// Non-success status returned by the endpoint
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the endpoint
        body: String,
    },

    /// Response body did not match the completions schema
    #[error("Malformed completion response: {0}")]
    Response(String),

    /// The endpoint returned an empty choice list
    #[error("Completion response contained no choices")]
    EmptyChoices,
}

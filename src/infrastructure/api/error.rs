use thiserror::Error;

/// Failure talking to the inference provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Error from the reqwest HTTP client
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Provider returned status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Response error: {0}")]
    ResponseError(String),
}

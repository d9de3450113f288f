//! Forecast provider error types.

/// Errors from the forecast HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("forecast API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

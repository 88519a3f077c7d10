//! Generation service error types

use thiserror::Error;

/// Errors from calls to the external generation service
///
/// The pipeline never retries these internally; retry and backoff policy
/// belongs to the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// Whether a caller-side retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::ApiError { status, .. } => *status == 429 || *status >= 500,
            GenerationError::Network(_) => true,
            GenerationError::InvalidResponse(_) => false,
            GenerationError::Json(_) => false,
        }
    }
}

//! Error taxonomy for backend API calls.
//!
//! All three variants are recoverable: reads degrade to a stale view plus an
//! error notification, commands to a failure notification plus a forced
//! refresh. Nothing here crashes the process.

use thiserror::Error;

/// Failure of a single backend API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the backend or the connection dropped.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's `error` field when the
    /// body carried one, otherwise the caller-supplied fallback text.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

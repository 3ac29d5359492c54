//! Errors that can occur while talking to the HTTP providers.

use babylon_staking_params::errors::ParamsError;
use babylon_staking_wallet_proto::ProviderError;
use thiserror::Error;

/// Errors that can occur while talking to the HTTP providers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or its response could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,

        /// The response body.
        body: String,
    },

    /// The response could not be turned into the expected data.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The parameter versions served are inconsistent.
    #[error("invalid params: {0}")]
    Params(#[from] ParamsError),
}

/// Result type alias for the HTTP providers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<ApiError> for ProviderError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) => ProviderError::Transport(e.to_string()),
            ApiError::Status { status, body } if (400..500).contains(&status) => {
                ProviderError::Rejected(body)
            }
            ApiError::Status { status, body } => {
                ProviderError::Transport(format!("server returned {status}: {body}"))
            }
            ApiError::Parse(_) | ApiError::Params(_) => {
                ProviderError::InvalidResponse(err.to_string())
            }
        }
    }
}

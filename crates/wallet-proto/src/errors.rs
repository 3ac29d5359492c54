//! Errors reported by the external collaborators.

use thiserror::Error;

/// Error reported by a wallet (either the Bitcoin signer or the PoS chain account).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The user declined the request.
    #[error("request was rejected by the wallet: {0}")]
    Rejected(String),

    /// There is no active wallet session.
    #[error("wallet is not connected")]
    NotConnected,

    /// The wallet answered with data that could not be understood.
    #[error("wallet returned malformed data: {0}")]
    Malformed(String),

    /// The request could not be delivered.
    #[error("wallet transport failed: {0}")]
    Transport(String),
}

/// Result type alias for wallet requests.
pub type WalletResult<T> = Result<T, WalletError>;

/// Error reported by a data provider or a broadcaster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached.
    #[error("provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with data that could not be understood.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The provider refused the request.
    #[error("request rejected by provider: {0}")]
    Rejected(String),
}

/// Result type alias for provider requests.
pub type ProviderResult<T> = Result<T, ProviderError>;

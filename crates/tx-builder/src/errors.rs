//! Errors that can occur while building the staking transactions.

use babylon_staking_primitives::errors::ScriptError;
use bitcoin::{psbt::Error as PsbtError, Amount, OutPoint};
use thiserror::Error;

/// Errors that can occur while building the staking transactions.
#[derive(Debug, Error)]
pub enum TxBuilderError {
    /// The requested delegation violates the staking parameters.
    #[error("invalid staking data: {0}")]
    InvalidStakingData(String),

    /// The inputs cannot cover the outputs and the fee.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// The amount needed.
        required: Amount,

        /// The amount that could be gathered.
        available: Amount,
    },

    /// The fee rate is zero or too large to be applied.
    #[error("invalid fee rate: {0} sat/vB")]
    InvalidFeeRate(u64),

    /// An input is locked by a script the builder cannot estimate a witness for.
    #[error("unsupported input script type for {0}")]
    UnsupportedInput(OutPoint),

    /// The transaction being spent does not contain the expected output.
    #[error("expected output not found in transaction: {0}")]
    MissingOutput(String),

    /// The staking scripts could not be built.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// Ways that a [`Psbt`](bitcoin::Psbt) might fail.
    #[error("PSBT error: {0}")]
    Psbt(#[from] PsbtError),
}

/// Result type alias for the transaction builder.
pub type TxBuilderResult<T> = Result<T, TxBuilderError>;

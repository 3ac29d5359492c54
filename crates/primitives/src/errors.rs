//! Errors raised while building scripts or checking transactions.

use bitcoin::{taproot::TaprootBuilderError, Amount, FeeRate};
use thiserror::Error;

/// Error while constructing a staking script or a taproot output.
#[derive(Debug, Clone, Error)]
pub enum ScriptError {
    /// No scripts were supplied for a script-only taproot output.
    #[error("no scripts provided for the taproot tree")]
    EmptyTapscript,

    /// A multisig script needs at least one key.
    #[error("no keys provided for the multisig script")]
    NoKeys,

    /// The same key appears more than once in a multisig script.
    #[error("duplicate keys in the multisig script")]
    DuplicateKeys,

    /// The quorum is zero or larger than the number of keys.
    #[error("quorum {quorum} is invalid for {keys} keys")]
    InvalidQuorum {
        /// The quorum.
        quorum: usize,

        /// The number of keys.
        keys: usize,
    },

    /// A leaf could not be added to the taproot tree.
    #[error("could not build taproot tree: {0}")]
    Taproot(#[from] TaprootBuilderError),

    /// The taproot tree was left incomplete.
    #[error("could not finalize the taproot tree")]
    TaprootFinalize,

    /// The requested leaf is not part of the taproot tree.
    #[error("leaf not found in the taproot tree")]
    MissingLeaf,
}

/// Result type alias for script construction.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// The fee paid by a signed transaction is inconsistent with the requested fee rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeSafetyError {
    /// The fee implies a rate far below the requested one.
    #[error("estimated fee {fee} is too low for {vsize} vB at {fee_rate} (expected {expected})")]
    FeeTooLow {
        /// The fee assumed by the builder.
        fee: Amount,

        /// The fee implied by the requested rate and the signed size.
        expected: Amount,

        /// The virtual size of the signed transaction.
        vsize: u64,

        /// The requested rate.
        fee_rate: FeeRate,
    },

    /// The fee implies a rate far above the requested one.
    #[error("estimated fee {fee} is too high for {vsize} vB at {fee_rate} (expected {expected})")]
    FeeTooHigh {
        /// The fee assumed by the builder.
        fee: Amount,

        /// The fee implied by the requested rate and the signed size.
        expected: Amount,

        /// The virtual size of the signed transaction.
        vsize: u64,

        /// The requested rate.
        fee_rate: FeeRate,
    },

    /// The expected fee overflows.
    #[error("fee rate {0} overflows for the transaction size")]
    Overflow(FeeRate),
}

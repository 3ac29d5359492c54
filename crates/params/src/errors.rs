//! Errors for the staking parameters.

use bitcoin::{Amount, XOnlyPublicKey};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error while validating a set of staking parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// The staking amount bounds are inverted.
    #[error("min staking amount {min} exceeds max staking amount {max}")]
    InvalidAmountRange {
        /// The lower bound.
        min: Amount,

        /// The upper bound.
        max: Amount,
    },

    /// The staking time bounds are inverted.
    #[error("min staking time {min} exceeds max staking time {max}")]
    InvalidTimeRange {
        /// The lower bound.
        min: u16,

        /// The upper bound.
        max: u16,
    },

    /// The covenant quorum cannot be met by the covenant committee.
    #[error("covenant quorum {quorum} is invalid for {keys} covenant keys")]
    InvalidQuorum {
        /// The quorum.
        quorum: u32,

        /// The number of covenant keys.
        keys: usize,
    },

    /// The same covenant key appears more than once.
    #[error("duplicate covenant key {0}")]
    DuplicateCovenantKey(XOnlyPublicKey),

    /// The slashing rate is not in `(0, 1)` or has more than two decimal places.
    #[error("invalid slashing rate {0}")]
    InvalidSlashingRate(Decimal),

    /// The unbonding fee would consume the whole minimum stake.
    #[error("unbonding fee {fee} must be lower than the min staking amount {min}")]
    UnbondingFeeTooHigh {
        /// The unbonding fee.
        fee: Amount,

        /// The min staking amount.
        min: Amount,
    },

    /// Two versions share the same activation height.
    #[error("duplicate activation height {0}")]
    DuplicateActivationHeight(u64),

    /// No parameter versions were supplied.
    #[error("no staking parameter versions")]
    Empty,
}

/// Result type alias for parameter validation.
pub type ParamsResult<T> = Result<T, ParamsError>;

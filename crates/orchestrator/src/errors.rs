//! Error types for the orchestrator crate.

use babylon_staking_primitives::{errors::FeeSafetyError, types::SigningStep};
use babylon_staking_tx_builder::errors::TxBuilderError;
use babylon_staking_wallet_proto::{ProviderError, WalletError};
use bitcoin::{Amount, Txid};
use thiserror::Error;

use crate::state::{DelegationStage, WithdrawalStage};

/// Errors that end a delegation or withdrawal attempt.
///
/// None of these is retried. The caller decides whether to start a new attempt from scratch.
#[derive(Debug, Error)]
pub enum StakingError {
    /// The requested delegation violates the parameter version.
    #[error("invalid staking data: {0}")]
    InvalidStakingData(String),

    /// The UTXOs cannot cover the stake and the fee.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// The amount needed.
        required: Amount,

        /// The amount that could be gathered.
        available: Amount,
    },

    /// The fee rate is zero or unusable.
    #[error("invalid fee rate: {0} sat/vB")]
    InvalidFeeRate(u64),

    /// Any other failure while building a transaction.
    #[error("could not build transaction: {0}")]
    Builder(TxBuilderError),

    /// The signer declined a request or answered with something unusable.
    #[error("signing was cancelled or rejected at step {step}: {reason}")]
    SigningRejected {
        /// The step being signed.
        step: SigningStep,

        /// What the signer reported.
        reason: String,
    },

    /// The staker's signature could not be found in a signed slashing transaction.
    #[error("no staker signature found in the signed transaction at step {step}")]
    SignatureExtractionFailed {
        /// The step whose transaction lacks the signature.
        step: SigningStep,
    },

    /// The fee of a signed transaction is inconsistent with the rate it was built for.
    #[error("fee safety violation: {0}")]
    FeeSafetyViolation(#[from] FeeSafetyError),

    /// The PoS chain executed the delegation transaction and rejected it.
    #[error("chain rejected the transaction with code {code}: {raw_log}")]
    ChainBroadcastRejected {
        /// The result code.
        code: u32,

        /// The log returned by the chain.
        raw_log: String,
    },

    /// The staking transaction could not be pushed to the Bitcoin network.
    ///
    /// When the delegation was already accepted by the PoS chain, `chain_tx_hash` identifies it and
    /// the staking transaction is still pending broadcast.
    #[error("bitcoin broadcast failed (chain tx {chain_tx_hash:?}): {reason}")]
    BtcBroadcastFailed {
        /// The hash of the accepted PoS chain transaction, if any.
        chain_tx_hash: Option<String>,

        /// What the broadcaster reported.
        reason: ProviderError,
    },

    /// No delegation with the given staking transaction hash is known.
    #[error("delegation {0} not found")]
    DelegationNotFound(Txid),

    /// No parameter version is active at the given height.
    #[error("no parameter version active at height {0}")]
    ParameterVersionNotFound(u64),

    /// There is no connected PoS chain account.
    #[error("not connected to a wallet")]
    NotConnected,

    /// The signer failed outside of a signing request.
    #[error("wallet error: {0}")]
    Wallet(WalletError),

    /// A fee estimator, parameter provider or chain client failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Data could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The configuration cannot be applied.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for the orchestrators.
pub type StakingResult<T> = Result<T, StakingError>;

impl From<TxBuilderError> for StakingError {
    fn from(err: TxBuilderError) -> Self {
        match err {
            TxBuilderError::InvalidStakingData(reason) => Self::InvalidStakingData(reason),
            TxBuilderError::InsufficientFunds {
                required,
                available,
            } => Self::InsufficientFunds {
                required,
                available,
            },
            TxBuilderError::InvalidFeeRate(rate) => Self::InvalidFeeRate(rate),
            err => Self::Builder(err),
        }
    }
}

impl From<WalletError> for StakingError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotConnected => Self::NotConnected,
            err => Self::Wallet(err),
        }
    }
}

impl StakingError {
    /// Turns a failed signing request into [`StakingError::SigningRejected`].
    pub(crate) fn signing(step: SigningStep, err: WalletError) -> Self {
        match err {
            WalletError::NotConnected => Self::NotConnected,
            err => Self::SigningRejected {
                step,
                reason: err.to_string(),
            },
        }
    }
}

/// A failed delegation attempt and the last stage it reached.
#[derive(Debug, Error)]
#[error("delegation failed after {last_stage}: {error}")]
pub struct DelegationFailure {
    /// The last stage reached before the failure.
    pub last_stage: DelegationStage,

    /// The cause.
    #[source]
    pub error: StakingError,
}

/// A failed withdrawal attempt and the last stage it reached.
#[derive(Debug, Error)]
#[error("withdrawal failed after {last_stage}: {error}")]
pub struct WithdrawalFailure {
    /// The last stage reached before the failure.
    pub last_stage: WithdrawalStage,

    /// The cause.
    #[source]
    pub error: StakingError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_builder_error() {
        assert!(matches!(
            StakingError::from(TxBuilderError::InvalidFeeRate(0)),
            StakingError::InvalidFeeRate(0)
        ));
        assert!(matches!(
            StakingError::from(TxBuilderError::MissingOutput("staking".to_string())),
            StakingError::Builder(TxBuilderError::MissingOutput(_))
        ));
    }

    #[test]
    fn test_signing_rejected_message() {
        let err = StakingError::signing(
            SigningStep::Unbonding,
            WalletError::Rejected("user closed the popup".to_string()),
        );

        assert!(err
            .to_string()
            .starts_with("signing was cancelled or rejected at step unbonding"));
        assert!(matches!(
            StakingError::signing(SigningStep::Staking, WalletError::NotConnected),
            StakingError::NotConnected
        ));
    }
}

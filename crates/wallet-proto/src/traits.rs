//! The traits that make up the collaborators' interfaces.

use std::future::Future;

use babylon_staking_params::{fees::Fees, versions::GlobalParams};
use babylon_staking_primitives::types::SigningStep;
use bitcoin::Txid;
use prost_types::Any;

use crate::{
    chain::{ChainTxResponse, StdFee},
    errors::{ProviderResult, WalletResult},
};

/// A connected Bitcoin wallet.
///
/// Every signing request is tagged with the [`SigningStep`] it belongs to so that the wallet can
/// present it to the user.
pub trait BtcSigner: Send + Sync {
    /// The hex-encoded compressed public key of the wallet.
    fn public_key_hex(&self) -> impl Future<Output = WalletResult<String>> + Send;

    /// The wallet's Bitcoin address.
    fn address(&self) -> impl Future<Output = WalletResult<String>> + Send;

    /// Signs the hex-encoded PSBT and returns the signed PSBT as hex.
    fn sign_psbt(
        &self,
        step: SigningStep,
        psbt_hex: &str,
    ) -> impl Future<Output = WalletResult<String>> + Send;

    /// Signs `message` per BIP 322 with the wallet's key.
    ///
    /// The encoding of the returned signature is wallet specific, usually base64.
    fn sign_message_bip322(
        &self,
        step: SigningStep,
        message: &str,
    ) -> impl Future<Output = WalletResult<String>> + Send;
}

/// Relays transactions to the Bitcoin network.
pub trait BtcBroadcaster: Send + Sync {
    /// Broadcasts the hex-encoded transaction and returns its txid.
    fn push_tx(&self, tx_hex: &str) -> impl Future<Output = ProviderResult<Txid>> + Send;
}

/// A connected account on the PoS chain.
pub trait ChainClient: Send + Sync {
    /// The address of the connected account.
    ///
    /// Fails with [`WalletError::NotConnected`](crate::errors::WalletError::NotConnected) when
    /// there is no session.
    fn account_address(&self) -> impl Future<Output = WalletResult<String>> + Send;

    /// Simulates the transaction carrying `msgs` and returns the gas it consumes.
    fn simulate(
        &self,
        signer: &str,
        msgs: &[Any],
        memo: &str,
    ) -> impl Future<Output = WalletResult<u64>> + Send;

    /// Signs the transaction carrying `msgs` and broadcasts it.
    ///
    /// A transaction that reaches the chain but fails is reported through a non-zero
    /// [`ChainTxResponse::code`], not through an error.
    fn sign_and_broadcast(
        &self,
        signer: &str,
        msgs: &[Any],
        fee: &StdFee,
        memo: &str,
    ) -> impl Future<Output = WalletResult<ChainTxResponse>> + Send;
}

/// Reports the fee rates currently observed on the Bitcoin network.
pub trait FeeEstimator: Send + Sync {
    /// The current fee tiers.
    fn network_fees(&self) -> impl Future<Output = ProviderResult<Fees>> + Send;
}

/// Reports the staking parameter versions.
pub trait ParamsProvider: Send + Sync {
    /// Every published version.
    fn global_params(&self) -> impl Future<Output = ProviderResult<GlobalParams>> + Send;
}

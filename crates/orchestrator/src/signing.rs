//! Round trips through the Bitcoin signer.

use std::str::FromStr;

use babylon_staking_primitives::types::{SigningStep, StakerInfo, UnsignedTx};
use babylon_staking_wallet_proto::BtcSigner;
use bitcoin::{secp256k1::PublicKey, Address, Network, Psbt, Transaction};
use tracing::debug;

use crate::errors::{StakingError, StakingResult};

/// A PSBT as returned by the signer and the transaction extracted from it.
#[derive(Debug, Clone)]
pub(crate) struct SignedPsbt {
    /// The PSBT, which may still carry partial signatures.
    pub(crate) psbt: Psbt,

    /// The transaction with whatever final witnesses the signer provided.
    pub(crate) tx: Transaction,
}

/// Reads the staker's compressed key and address from the signer.
pub(crate) async fn read_staker<S: BtcSigner>(
    signer: &S,
    network: Network,
) -> StakingResult<(PublicKey, StakerInfo)> {
    let public_key_hex = signer.public_key_hex().await?;
    let public_key = PublicKey::from_str(public_key_hex.trim()).map_err(|e| {
        StakingError::Encoding(format!("invalid staker public key {public_key_hex}: {e}"))
    })?;

    let address = signer.address().await?;
    let address = Address::from_str(&address)
        .and_then(|address| address.require_network(network))
        .map_err(|e| StakingError::Encoding(format!("invalid staker address {address}: {e}")))?;

    let staker = StakerInfo {
        address,
        public_key: public_key.x_only_public_key().0,
    };

    Ok((public_key, staker))
}

/// Hands `unsigned` to the signer and decodes its answer.
///
/// The signer may add signatures but must not alter the transaction itself.
pub(crate) async fn sign_psbt<S: BtcSigner>(
    signer: &S,
    step: SigningStep,
    unsigned: UnsignedTx,
) -> StakingResult<SignedPsbt> {
    let txid = unsigned.compute_txid();
    debug!(%step, %txid, "requesting PSBT signature");

    let signed_hex = signer
        .sign_psbt(step, &unsigned.to_hex())
        .await
        .map_err(|e| StakingError::signing(step, e))?;

    let rejected = |reason: String| StakingError::SigningRejected { step, reason };

    let bytes = hex::decode(signed_hex.trim())
        .map_err(|e| rejected(format!("signed PSBT is not hex: {e}")))?;
    let psbt =
        Psbt::deserialize(&bytes).map_err(|e| rejected(format!("invalid signed PSBT: {e}")))?;

    if psbt.unsigned_tx.compute_txid() != txid {
        return Err(rejected(format!(
            "signer returned transaction {} instead of {txid}",
            psbt.unsigned_tx.compute_txid()
        )));
    }

    let tx = psbt.clone().extract_tx_unchecked_fee_rate();

    Ok(SignedPsbt { psbt, tx })
}

/// Checks that every input of a transaction about to be broadcast carries a witness.
pub(crate) fn ensure_finalized(step: SigningStep, signed: &SignedPsbt) -> StakingResult<()> {
    match signed.tx.input.iter().position(|input| input.witness.is_empty()) {
        Some(index) => Err(StakingError::SigningRejected {
            step,
            reason: format!("input {index} was not finalized by the signer"),
        }),
        None => Ok(()),
    }
}

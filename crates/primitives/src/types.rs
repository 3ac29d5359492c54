//! Types that are handed between the transaction builder, the signers and the orchestrators.

use std::fmt;

use bitcoin::{
    Address, Amount, FeeRate, OutPoint, Psbt, ScriptBuf, TxOut, Txid, XOnlyPublicKey,
};
use serde::{Deserialize, Serialize};

/// A spendable output owned by the staker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// The transaction that created the output.
    pub txid: Txid,

    /// The index of the output.
    pub vout: u32,

    /// The value of the output.
    pub value: Amount,

    /// The locking script of the output.
    pub script_pubkey: ScriptBuf,
}

impl Utxo {
    /// The outpoint of this output.
    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.txid, self.vout)
    }

    /// The output as it appears in the funding transaction.
    pub fn txout(&self) -> TxOut {
        TxOut {
            value: self.value,
            script_pubkey: self.script_pubkey.clone(),
        }
    }
}

/// The staker's identity on Bitcoin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakerInfo {
    /// The address that receives change and withdrawals.
    pub address: Address,

    /// The key that locks the staking scripts.
    pub public_key: XOnlyPublicKey,
}

/// An unsigned transaction together with the fee that the builder assumed for it.
///
/// This is intentionally not [`Clone`]: an artifact is handed to exactly one signer.
#[derive(Debug)]
pub struct UnsignedTx {
    psbt: Psbt,
    fee: Amount,
    absorbed_change: Amount,
}

impl UnsignedTx {
    /// Wraps a [`Psbt`] built with the given `fee`.
    pub const fn new(psbt: Psbt, fee: Amount) -> Self {
        Self {
            psbt,
            fee,
            absorbed_change: Amount::ZERO,
        }
    }

    /// Records change that was too small for an output and was left to the miners instead.
    pub fn with_absorbed_change(mut self, absorbed_change: Amount) -> Self {
        self.absorbed_change = absorbed_change;
        self
    }

    /// The underlying [`Psbt`].
    pub const fn psbt(&self) -> &Psbt {
        &self.psbt
    }

    /// The fee the builder estimated for the requested fee rate.
    pub const fn fee(&self) -> Amount {
        self.fee
    }

    /// The dust change that was dropped in favour of the miners.
    pub const fn absorbed_change(&self) -> Amount {
        self.absorbed_change
    }

    /// What the transaction actually pays: the estimated fee plus any absorbed change.
    pub fn paid_fee(&self) -> Amount {
        self.fee + self.absorbed_change
    }

    /// The txid of the unsigned transaction, which does not change once witnesses are added.
    pub fn compute_txid(&self) -> Txid {
        self.psbt.unsigned_tx.compute_txid()
    }

    /// The fee rate implied by the assumed fee and the unsigned size.
    ///
    /// This overestimates the final rate since witnesses are not accounted for.
    pub fn fee_rate(&self) -> FeeRate {
        let vsize = self.psbt.unsigned_tx.vsize() as u64;

        FeeRate::from_sat_per_vb_unchecked(self.fee.to_sat() / vsize)
    }

    /// Serializes the [`Psbt`] for a signer.
    pub fn to_hex(&self) -> String {
        self.psbt.serialize_hex()
    }

    /// Consumes the artifact.
    pub fn into_psbt(self) -> Psbt {
        self.psbt
    }
}

/// The signing prompts issued while creating a delegation or a withdrawal.
///
/// Every signing callback is tagged with one of these so that a signer (or a UI) can tell them
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigningStep {
    /// The staking transaction.
    Staking,

    /// The unbonding transaction.
    Unbonding,

    /// The slashing transaction that spends the staking output.
    StakingOutputSlashing,

    /// The slashing transaction that spends the unbonding output.
    UnbondingOutputSlashing,

    /// The proof of possession over the chain address.
    ProofOfPossession,

    /// The delegation message on the PoS chain.
    SubmitBbnTx,

    /// The withdrawal transaction.
    Withdrawal,
}

impl SigningStep {
    /// The tag for this step.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Staking => "staking",
            Self::Unbonding => "unbonding",
            Self::StakingOutputSlashing => "staking-output-slashing",
            Self::UnbondingOutputSlashing => "unbonding-output-slashing",
            Self::ProofOfPossession => "proof-of-possession",
            Self::SubmitBbnTx => "submit-bbn-tx",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for SigningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

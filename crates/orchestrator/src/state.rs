//! The stages of the delegation and withdrawal state machines.
//!
//! Both machines only move forward. A failure at any stage ends the attempt and is reported
//! together with the last stage reached, see
//! [`DelegationFailure`](crate::errors::DelegationFailure) and
//! [`WithdrawalFailure`](crate::errors::WithdrawalFailure).

use std::fmt;

/// The stages of a delegation attempt, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DelegationStage {
    /// Nothing has been done yet.
    Init,

    /// The staking transaction has been built.
    StakingBuilt,

    /// The staking transaction has been signed and its fee checked.
    StakingSigned,

    /// The unbonding transaction has been built.
    UnbondingBuilt,

    /// The unbonding transaction has been signed.
    UnbondingSigned,

    /// The slashing transaction of the staking output has been built.
    StakingSlashingBuilt,

    /// The slashing transaction of the staking output has been signed.
    StakingSlashingSigned,

    /// The staker's signature over the staking output slashing has been extracted.
    StakingSigExtracted,

    /// The slashing transaction of the unbonding output has been built.
    UnbondingSlashingBuilt,

    /// The slashing transaction of the unbonding output has been signed.
    UnbondingSlashingSigned,

    /// The staker's signature over the unbonding output slashing has been extracted.
    UnbondingSigExtracted,

    /// The proof of possession has been signed.
    ProofOfPossessionSigned,

    /// The delegation message has been assembled.
    MessageAssembled,

    /// The PoS chain fee has been estimated.
    GasEstimated,

    /// The first chain has accepted its transaction.
    Broadcast,

    /// Both chains have accepted their transactions.
    Done,
}

impl DelegationStage {
    /// The name of the stage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::StakingBuilt => "staking-built",
            Self::StakingSigned => "staking-signed",
            Self::UnbondingBuilt => "unbonding-built",
            Self::UnbondingSigned => "unbonding-signed",
            Self::StakingSlashingBuilt => "staking-slashing-built",
            Self::StakingSlashingSigned => "staking-slashing-signed",
            Self::StakingSigExtracted => "staking-sig-extracted",
            Self::UnbondingSlashingBuilt => "unbonding-slashing-built",
            Self::UnbondingSlashingSigned => "unbonding-slashing-signed",
            Self::UnbondingSigExtracted => "unbonding-sig-extracted",
            Self::ProofOfPossessionSigned => "proof-of-possession-signed",
            Self::MessageAssembled => "message-assembled",
            Self::GasEstimated => "gas-estimated",
            Self::Broadcast => "broadcast",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for DelegationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stages of a withdrawal attempt, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WithdrawalStage {
    /// Nothing has been done yet.
    Init,

    /// The delegation and its parameter version are known.
    ParamsResolved,

    /// The withdrawal transaction has been built.
    WithdrawalBuilt,

    /// The withdrawal transaction has been signed.
    WithdrawalSigned,

    /// The fee of the signed transaction has been checked.
    FeeChecked,

    /// The withdrawal transaction has been pushed.
    Broadcast,

    /// The withdrawal is complete.
    Done,
}

impl WithdrawalStage {
    /// The name of the stage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ParamsResolved => "params-resolved",
            Self::WithdrawalBuilt => "withdrawal-built",
            Self::WithdrawalSigned => "withdrawal-signed",
            Self::FeeChecked => "fee-checked",
            Self::Broadcast => "broadcast",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for WithdrawalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_are_ordered() {
        assert!(DelegationStage::Init < DelegationStage::StakingBuilt);
        assert!(DelegationStage::UnbondingSigExtracted < DelegationStage::ProofOfPossessionSigned);
        assert!(DelegationStage::Broadcast < DelegationStage::Done);
        assert!(WithdrawalStage::WithdrawalSigned < WithdrawalStage::FeeChecked);

        assert_eq!(DelegationStage::UnbondingBuilt.to_string(), "unbonding-built");
        assert_eq!(WithdrawalStage::ParamsResolved.to_string(), "params-resolved");
    }
}

//! The read model of a delegation that already exists on the PoS chain.
//!
//! Whether a delegation was unbonded early decides how its funds are withdrawn, so this is decided
//! once when the delegation is loaded and carried in the type.

use bitcoin::{Amount, Transaction, TxOut, Txid, XOnlyPublicKey};
use serde::{Deserialize, Serialize};

/// The lifecycle state of a delegation as reported by the staking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelegationState {
    /// The stake is active.
    Active,

    /// The staker asked to unbond.
    UnbondingRequested,

    /// The unbonding transaction is confirming.
    Unbonding,

    /// The unbonding timelock has expired.
    Unbonded,

    /// The funds were withdrawn.
    Withdrawn,

    /// The staking transaction is not yet confirmed.
    Pending,

    /// The staking cap was exceeded.
    Overflow,

    /// The staking timelock has expired.
    Expired,

    /// An unbonding was submitted but not yet observed.
    IntermediateUnbonding,

    /// A withdrawal was submitted but not yet observed.
    IntermediateWithdrawal,
}

/// The data shared by every kind of delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationInfo {
    /// The txid of the staking transaction.
    pub staking_tx_hash: Txid,

    /// The signed staking transaction.
    pub staking_tx: Transaction,

    /// The index of the staking output.
    pub staking_output_index: u32,

    /// The Bitcoin height at which the staking transaction was included.
    pub start_height: u64,

    /// The staking term in blocks.
    pub timelock: u16,

    /// The finality provider the stake is delegated to.
    pub finality_provider_pk: XOnlyPublicKey,

    /// The state reported by the API.
    pub state: DelegationState,
}

impl DelegationInfo {
    /// The staking output, if the index points at one.
    pub fn staking_output(&self) -> Option<&TxOut> {
        self.staking_tx
            .output
            .get(self.staking_output_index as usize)
    }

    /// The staked amount.
    pub fn staking_value(&self) -> Option<Amount> {
        self.staking_output().map(|output| output.value)
    }
}

/// A delegation that can only be withdrawn once its staking timelock expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelockDelegation {
    /// The delegation.
    pub info: DelegationInfo,
}

/// A delegation that was unbonded early and is withdrawn from its unbonding output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbondedDelegation {
    /// The delegation.
    pub info: DelegationInfo,

    /// The signed unbonding transaction.
    pub unbonding_tx: Transaction,
}

/// A delegation along with the path its funds must take to be withdrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delegation {
    /// No unbonding transaction was recorded.
    Timelock(TimelockDelegation),

    /// An unbonding transaction was recorded.
    Unbonded(UnbondedDelegation),
}

impl Delegation {
    /// Classifies a delegation by whether it carries an unbonding transaction.
    pub fn new(info: DelegationInfo, unbonding_tx: Option<Transaction>) -> Self {
        match unbonding_tx {
            Some(unbonding_tx) => Self::Unbonded(UnbondedDelegation { info, unbonding_tx }),
            None => Self::Timelock(TimelockDelegation { info }),
        }
    }

    /// The data shared by every kind of delegation.
    pub const fn info(&self) -> &DelegationInfo {
        match self {
            Self::Timelock(delegation) => &delegation.info,
            Self::Unbonded(delegation) => &delegation.info,
        }
    }

    /// The txid of the staking transaction.
    pub const fn staking_tx_hash(&self) -> &Txid {
        &self.info().staking_tx_hash
    }
}

/// Looks up the delegation whose staking transaction is `staking_tx_hash`.
pub fn find_delegation<'a>(
    delegations: &'a [Delegation],
    staking_tx_hash: &Txid,
) -> Option<&'a Delegation> {
    delegations
        .iter()
        .find(|delegation| delegation.staking_tx_hash() == staking_tx_hash)
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        absolute::LockTime,
        hashes::Hash,
        secp256k1::{Keypair, SECP256K1},
        transaction, ScriptBuf,
    };

    use super::*;

    fn info(seed: u8) -> DelegationInfo {
        let staking_tx = Transaction {
            version: transaction::Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![],
            output: vec![TxOut {
                value: Amount::from_sat(10_000 * seed as u64),
                script_pubkey: ScriptBuf::new(),
            }],
        };

        DelegationInfo {
            staking_tx_hash: staking_tx.compute_txid(),
            staking_tx,
            staking_output_index: 0,
            start_height: 100,
            timelock: 150,
            finality_provider_pk: Keypair::from_seckey_slice(SECP256K1, &[seed; 32])
                .unwrap()
                .x_only_public_key()
                .0,
            state: DelegationState::Active,
        }
    }

    #[test]
    fn test_delegation_variant_is_decided_on_load() {
        let timelock = Delegation::new(info(1), None);
        assert!(matches!(timelock, Delegation::Timelock(_)));

        let unbonding_tx = info(2).staking_tx;
        let unbonded = Delegation::new(info(3), Some(unbonding_tx.clone()));
        assert!(
            matches!(unbonded, Delegation::Unbonded(ref d) if d.unbonding_tx == unbonding_tx)
        );
    }

    #[test]
    fn test_find_delegation() {
        let delegations = vec![
            Delegation::new(info(1), None),
            Delegation::new(info(2), None),
        ];
        let target = *delegations[1].staking_tx_hash();

        let found = find_delegation(&delegations, &target).expect("must be found");
        assert_eq!(found.info().staking_value(), Some(Amount::from_sat(20_000)));

        assert!(find_delegation(&delegations, &Txid::all_zeros()).is_none());
    }

    #[test]
    fn test_delegation_state_serde() {
        let state: DelegationState = serde_json::from_str(r#""UNBONDING_REQUESTED""#).unwrap();
        assert_eq!(state, DelegationState::UnbondingRequested);

        let json = serde_json::to_string(&DelegationState::IntermediateWithdrawal).unwrap();
        assert_eq!(json, r#""INTERMEDIATE_WITHDRAWAL""#);
    }
}

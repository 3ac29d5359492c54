//! The interface through which the orchestrators obtain unsigned transactions.

use babylon_staking_primitives::{
    delegation::{TimelockDelegation, UnbondedDelegation},
    types::{UnsignedTx, Utxo},
};
use bitcoin::{Amount, Transaction};

use crate::{
    errors::TxBuilderResult,
    terms::{fee_rate, StakingTerms},
    transactions::{
        slashing::{build_staking_slashing_tx, build_unbonding_slashing_tx},
        staking::build_staking_tx,
        unbonding::build_unbonding_tx,
        withdrawal::{build_withdrawal_early_unbonded_tx, build_withdrawal_timelock_expired_tx},
    },
};

/// Builds the unsigned transactions of a delegation.
///
/// Fee rates are in sat/vB. Transactions that spend a previous transaction of the delegation take
/// the signed form of it, since only that one has the txid the chain will see.
pub trait TransactionBuilder: Send + Sync {
    /// Builds the staking transaction funded by `utxos`.
    fn build_staking(
        &self,
        terms: &StakingTerms,
        amount: Amount,
        utxos: &[Utxo],
        fee_rate: u64,
    ) -> TxBuilderResult<UnsignedTx>;

    /// Builds the unbonding transaction that spends the staking output of `staking_tx`.
    fn build_unbonding(
        &self,
        terms: &StakingTerms,
        staking_tx: &Transaction,
    ) -> TxBuilderResult<UnsignedTx>;

    /// Builds the slashing transaction that spends the staking output of `staking_tx`.
    fn build_staking_slashing(
        &self,
        terms: &StakingTerms,
        staking_tx: &Transaction,
    ) -> TxBuilderResult<UnsignedTx>;

    /// Builds the slashing transaction that spends the unbonding output of `unbonding_tx`.
    fn build_unbonding_slashing(
        &self,
        terms: &StakingTerms,
        unbonding_tx: &Transaction,
    ) -> TxBuilderResult<UnsignedTx>;

    /// Builds the withdrawal of a delegation that was unbonded early.
    fn build_withdrawal_early_unbonded(
        &self,
        terms: &StakingTerms,
        delegation: &UnbondedDelegation,
        fee_rate: u64,
    ) -> TxBuilderResult<UnsignedTx>;

    /// Builds the withdrawal of a delegation whose staking term has expired.
    fn build_withdrawal_timelock_expired(
        &self,
        terms: &StakingTerms,
        delegation: &TimelockDelegation,
        fee_rate: u64,
    ) -> TxBuilderResult<UnsignedTx>;
}

/// Builds the transactions with the Babylon staking scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BabylonTxBuilder;

impl TransactionBuilder for BabylonTxBuilder {
    fn build_staking(
        &self,
        terms: &StakingTerms,
        amount: Amount,
        utxos: &[Utxo],
        fee_rate_sat_vb: u64,
    ) -> TxBuilderResult<UnsignedTx> {
        let fee_rate = fee_rate(fee_rate_sat_vb)?;

        build_staking_tx(terms, amount, utxos, fee_rate)
    }

    fn build_unbonding(
        &self,
        terms: &StakingTerms,
        staking_tx: &Transaction,
    ) -> TxBuilderResult<UnsignedTx> {
        build_unbonding_tx(terms, staking_tx)
    }

    fn build_staking_slashing(
        &self,
        terms: &StakingTerms,
        staking_tx: &Transaction,
    ) -> TxBuilderResult<UnsignedTx> {
        build_staking_slashing_tx(terms, staking_tx)
    }

    fn build_unbonding_slashing(
        &self,
        terms: &StakingTerms,
        unbonding_tx: &Transaction,
    ) -> TxBuilderResult<UnsignedTx> {
        build_unbonding_slashing_tx(terms, unbonding_tx)
    }

    fn build_withdrawal_early_unbonded(
        &self,
        terms: &StakingTerms,
        delegation: &UnbondedDelegation,
        fee_rate_sat_vb: u64,
    ) -> TxBuilderResult<UnsignedTx> {
        let fee_rate = fee_rate(fee_rate_sat_vb)?;

        build_withdrawal_early_unbonded_tx(terms, delegation, fee_rate)
    }

    fn build_withdrawal_timelock_expired(
        &self,
        terms: &StakingTerms,
        delegation: &TimelockDelegation,
        fee_rate_sat_vb: u64,
    ) -> TxBuilderResult<UnsignedTx> {
        let fee_rate = fee_rate(fee_rate_sat_vb)?;

        build_withdrawal_timelock_expired_tx(terms, delegation, fee_rate)
    }
}

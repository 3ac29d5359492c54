//! The withdrawal transactions that return the stake to the staker through a timelock leaf.

use babylon_staking_params::default::DUST_THRESHOLD;
use babylon_staking_primitives::{
    constants::{SCHNORR_SIGNATURE_SIZE, SEGWIT_MARKER_WEIGHT},
    delegation::{TimelockDelegation, UnbondedDelegation},
    scripts::{
        general::{create_tx, create_tx_ins, create_tx_outs},
        staking::StakingScripts,
        taproot::control_block_for,
    },
    types::UnsignedTx,
};
use bitcoin::{
    taproot::TaprootSpendInfo, Amount, FeeRate, OutPoint, Psbt, Sequence, TxOut, Weight, Witness,
};
use tracing::debug;

use super::{find_output, set_script_path};
use crate::{
    errors::{TxBuilderError, TxBuilderResult},
    terms::StakingTerms,
};

/// Builds the withdrawal of a delegation that was unbonded early.
///
/// This spends the unbonding output through its timelock leaf, so the transaction is only valid
/// once the unbonding time has passed since the unbonding transaction confirmed.
pub(crate) fn build_withdrawal_early_unbonded_tx(
    terms: &StakingTerms,
    delegation: &UnbondedDelegation,
    fee_rate: FeeRate,
) -> TxBuilderResult<UnsignedTx> {
    let scripts = terms.unbonding_scripts()?;
    let (address, spend_info) = scripts.unbonding_output(terms.network)?;

    let unbonding_tx = &delegation.unbonding_tx;
    let (vout, prevout) =
        find_output(unbonding_tx, &address.script_pubkey(), "unbonding output")?;

    build_withdrawal_tx(
        terms,
        Spent {
            outpoint: OutPoint::new(unbonding_tx.compute_txid(), vout),
            prevout: prevout.clone(),
            lock_time: terms.params.unbonding_time,
            scripts,
            spend_info,
        },
        fee_rate,
    )
}

/// Builds the withdrawal of a delegation whose staking term has expired.
///
/// This spends the staking output through its timelock leaf.
pub(crate) fn build_withdrawal_timelock_expired_tx(
    terms: &StakingTerms,
    delegation: &TimelockDelegation,
    fee_rate: FeeRate,
) -> TxBuilderResult<UnsignedTx> {
    let info = &delegation.info;

    let scripts = terms.staking_scripts()?;
    let (address, spend_info) = scripts.staking_output(terms.network)?;

    let prevout = info
        .staking_output()
        .filter(|output| output.script_pubkey == address.script_pubkey())
        .ok_or_else(|| {
            TxBuilderError::MissingOutput(format!(
                "staking output at index {} of {}",
                info.staking_output_index, info.staking_tx_hash
            ))
        })?;

    build_withdrawal_tx(
        terms,
        Spent {
            outpoint: OutPoint::new(info.staking_tx.compute_txid(), info.staking_output_index),
            prevout: prevout.clone(),
            lock_time: info.timelock,
            scripts,
            spend_info,
        },
        fee_rate,
    )
}

/// The timelocked output being withdrawn.
struct Spent {
    outpoint: OutPoint,
    prevout: TxOut,
    lock_time: u16,
    scripts: StakingScripts,
    spend_info: TaprootSpendInfo,
}

fn build_withdrawal_tx(
    terms: &StakingTerms,
    spent: Spent,
    fee_rate: FeeRate,
) -> TxBuilderResult<UnsignedTx> {
    let tx_ins = create_tx_ins([spent.outpoint], Sequence::from_height(spent.lock_time));
    let tx_outs = create_tx_outs([(terms.staker.address.script_pubkey(), Amount::ZERO)]);
    let mut tx = create_tx(tx_ins, tx_outs);

    let witness_weight = timelock_witness_weight(&spent)?;
    let fee = fee_rate
        .checked_mul_by_weight(tx.weight() + SEGWIT_MARKER_WEIGHT + witness_weight)
        .ok_or(TxBuilderError::InvalidFeeRate(fee_rate.to_sat_per_vb_ceil()))?;

    let available = spent.prevout.value;
    let value = available
        .checked_sub(fee)
        .filter(|value| *value > DUST_THRESHOLD)
        .ok_or(TxBuilderError::InsufficientFunds {
            required: fee.checked_add(DUST_THRESHOLD).unwrap_or(Amount::MAX),
            available,
        })?;

    tx.output[0].value = value;

    let mut psbt = Psbt::from_unsigned_tx(tx)?;
    set_script_path(
        &mut psbt.inputs[0],
        spent.prevout,
        &spent.spend_info,
        &spent.scripts.timelock,
    )?;

    debug!(
        txid = %psbt.unsigned_tx.compute_txid(),
        %fee,
        %value,
        "built withdrawal transaction"
    );

    Ok(UnsignedTx::new(psbt, fee))
}

/// The weight of `[signature, timelock leaf, control block]`.
fn timelock_witness_weight(spent: &Spent) -> TxBuilderResult<Weight> {
    let control_block = control_block_for(&spent.spend_info, &spent.scripts.timelock)?;

    let mut witness = Witness::new();
    witness.push([0u8; SCHNORR_SIGNATURE_SIZE]);
    witness.push(spent.scripts.timelock.as_bytes());
    witness.push(control_block.serialize());

    Ok(Weight::from_wu(witness.size() as u64))
}

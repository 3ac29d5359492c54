//! The staking transaction that locks the stake out of the staker's UTXOs.

use babylon_staking_params::default::DUST_THRESHOLD;
use babylon_staking_primitives::{
    constants::{P2TR_KEY_SPEND_WITNESS_WEIGHT, P2WPKH_WITNESS_WEIGHT, SEGWIT_MARKER_WEIGHT},
    scripts::general::{create_tx, create_tx_ins, create_tx_outs},
    types::{UnsignedTx, Utxo},
};
use bitcoin::{Amount, FeeRate, Psbt, ScriptBuf, Sequence, Transaction, Weight};
use tracing::debug;

use crate::{
    errors::{TxBuilderError, TxBuilderResult},
    terms::StakingTerms,
};

/// The index of the staking output in the staking transaction.
pub const STAKING_OUTPUT_INDEX: usize = 0;

/// Builds the staking transaction for `amount` funded by `utxos`.
///
/// UTXOs are selected largest first until they cover the amount and the fee. A change output back
/// to the staker is only added when the change is above dust, otherwise the remainder goes to the
/// miners. The reported fee is always the estimate for `fee_rate`; a dropped remainder is tracked
/// as absorbed change.
pub(crate) fn build_staking_tx(
    terms: &StakingTerms,
    amount: Amount,
    utxos: &[Utxo],
    fee_rate: FeeRate,
) -> TxBuilderResult<UnsignedTx> {
    terms.validate_staking(amount)?;

    let (staking_address, _) = terms.staking_scripts()?.staking_output(terms.network)?;
    let staking_output = (staking_address.script_pubkey(), amount);
    let change_script = terms.staker.address.script_pubkey();

    let mut sorted = utxos.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| b.value.cmp(&a.value));

    let mut selected = Vec::with_capacity(sorted.len());
    let mut total = Amount::ZERO;
    let mut witness_weight = Weight::ZERO;
    let mut required = amount;

    for utxo in sorted {
        witness_weight += input_witness_weight(utxo)?;
        total += utxo.value;
        selected.push(utxo);

        let fee_with_change = estimate_fee(
            &selected,
            [
                staking_output.clone(),
                (change_script.clone(), Amount::ZERO),
            ],
            witness_weight,
            fee_rate,
        )?;

        if let Some(change) = total
            .checked_sub(amount)
            .and_then(|left| left.checked_sub(fee_with_change))
        {
            if change > DUST_THRESHOLD {
                return finalize(
                    terms,
                    &selected,
                    [staking_output, (change_script, change)],
                    fee_with_change,
                );
            }
        }

        let fee_without_change =
            estimate_fee(&selected, [staking_output.clone()], witness_weight, fee_rate)?;

        required = amount
            .checked_add(fee_without_change)
            .ok_or(TxBuilderError::InvalidFeeRate(fee_rate.to_sat_per_vb_ceil()))?;

        if total >= required {
            let absorbed = total - required;
            debug!(%total, %amount, %absorbed, "dropping dust change");

            return finalize(terms, &selected, [staking_output], fee_without_change)
                .map(|unsigned| unsigned.with_absorbed_change(absorbed));
        }
    }

    Err(TxBuilderError::InsufficientFunds {
        required,
        available: total,
    })
}

/// The weight of the witness that will spend `utxo`.
fn input_witness_weight(utxo: &Utxo) -> TxBuilderResult<Weight> {
    if utxo.script_pubkey.is_p2tr() {
        Ok(P2TR_KEY_SPEND_WITNESS_WEIGHT)
    } else if utxo.script_pubkey.is_p2wpkh() {
        Ok(P2WPKH_WITNESS_WEIGHT)
    } else {
        Err(TxBuilderError::UnsupportedInput(utxo.outpoint()))
    }
}

fn unsigned_tx<const N: usize>(
    utxos: &[&Utxo],
    outputs: [(ScriptBuf, Amount); N],
) -> Transaction {
    let tx_ins = create_tx_ins(utxos.iter().map(|utxo| utxo.outpoint()), Sequence::MAX);
    let tx_outs = create_tx_outs(outputs);

    create_tx(tx_ins, tx_outs)
}

fn estimate_fee<const N: usize>(
    utxos: &[&Utxo],
    outputs: [(ScriptBuf, Amount); N],
    witness_weight: Weight,
    fee_rate: FeeRate,
) -> TxBuilderResult<Amount> {
    let weight = unsigned_tx(utxos, outputs).weight() + SEGWIT_MARKER_WEIGHT + witness_weight;

    fee_rate
        .checked_mul_by_weight(weight)
        .ok_or(TxBuilderError::InvalidFeeRate(fee_rate.to_sat_per_vb_ceil()))
}

fn finalize<const N: usize>(
    terms: &StakingTerms,
    utxos: &[&Utxo],
    outputs: [(ScriptBuf, Amount); N],
    fee: Amount,
) -> TxBuilderResult<UnsignedTx> {
    let mut psbt = Psbt::from_unsigned_tx(unsigned_tx(utxos, outputs))?;

    for (input, utxo) in psbt.inputs.iter_mut().zip(utxos) {
        input.witness_utxo = Some(utxo.txout());

        if utxo.script_pubkey.is_p2tr() {
            input.tap_internal_key = Some(terms.staker.public_key);
        }
    }

    debug!(
        txid = %psbt.unsigned_tx.compute_txid(),
        %fee,
        inputs = utxos.len(),
        "built staking transaction"
    );

    Ok(UnsignedTx::new(psbt, fee))
}

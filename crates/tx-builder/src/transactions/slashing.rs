//! The slashing transactions that the staker pre-signs for the covenant committee.
//!
//! There is one for the staking output and one for the unbonding output. Both spend through the
//! slashing leaf, burn a share of the stake to the slashing script and return the rest to the
//! staker behind the unbonding timelock.

use babylon_staking_params::default::DUST_THRESHOLD;
use babylon_staking_primitives::{
    scripts::{
        general::{create_tx, create_tx_ins, create_tx_outs},
        staking::slashing_change_output,
    },
    types::UnsignedTx,
};
use bitcoin::{
    taproot::TaprootSpendInfo, Address, Amount, OutPoint, Psbt, ScriptBuf, Sequence, Transaction,
};
use tracing::debug;

use super::{find_output, set_script_path};
use crate::{
    errors::{TxBuilderError, TxBuilderResult},
    terms::StakingTerms,
};

/// Builds the slashing transaction that spends the staking output of `staking_tx`.
pub(crate) fn build_staking_slashing_tx(
    terms: &StakingTerms,
    staking_tx: &Transaction,
) -> TxBuilderResult<UnsignedTx> {
    let scripts = terms.staking_scripts()?;
    let (address, spend_info) = scripts.staking_output(terms.network)?;

    build_slashing_tx(
        terms,
        staking_tx,
        SlashedOutput {
            what: "staking output",
            address,
            spend_info,
            slashing_leaf: scripts.slashing,
        },
    )
}

/// Builds the slashing transaction that spends the unbonding output of `unbonding_tx`.
pub(crate) fn build_unbonding_slashing_tx(
    terms: &StakingTerms,
    unbonding_tx: &Transaction,
) -> TxBuilderResult<UnsignedTx> {
    let scripts = terms.unbonding_scripts()?;
    let (address, spend_info) = scripts.unbonding_output(terms.network)?;

    build_slashing_tx(
        terms,
        unbonding_tx,
        SlashedOutput {
            what: "unbonding output",
            address,
            spend_info,
            slashing_leaf: scripts.slashing,
        },
    )
}

/// The output a slashing transaction spends.
struct SlashedOutput {
    what: &'static str,
    address: Address,
    spend_info: TaprootSpendInfo,
    slashing_leaf: ScriptBuf,
}

fn build_slashing_tx(
    terms: &StakingTerms,
    prev_tx: &Transaction,
    slashed: SlashedOutput,
) -> TxBuilderResult<UnsignedTx> {
    let slashing = &terms.params.slashing;

    let (vout, prevout) = find_output(prev_tx, &slashed.address.script_pubkey(), slashed.what)?;

    let slashing_amount = slashing.slashing_amount(prevout.value);
    let change_amount = prevout
        .value
        .checked_sub(slashing_amount)
        .and_then(|left| left.checked_sub(slashing.min_slashing_tx_fee))
        .unwrap_or(Amount::ZERO);

    if slashing_amount <= DUST_THRESHOLD || change_amount <= DUST_THRESHOLD {
        return Err(TxBuilderError::InvalidStakingData(format!(
            "slashing {} of {} leaves dust: slashed {slashing_amount}, change {change_amount}",
            slashed.what, prevout.value
        )));
    }

    let (change_address, _) = slashing_change_output(
        &terms.staker.public_key,
        terms.params.unbonding_time,
        terms.network,
    )?;

    let tx_ins = create_tx_ins([OutPoint::new(prev_tx.compute_txid(), vout)], Sequence::MAX);
    let tx_outs = create_tx_outs([
        (slashing.slashing_pk_script.clone(), slashing_amount),
        (change_address.script_pubkey(), change_amount),
    ]);

    let mut psbt = Psbt::from_unsigned_tx(create_tx(tx_ins, tx_outs))?;
    set_script_path(
        &mut psbt.inputs[0],
        prevout.clone(),
        &slashed.spend_info,
        &slashed.slashing_leaf,
    )?;

    debug!(
        txid = %psbt.unsigned_tx.compute_txid(),
        spent = slashed.what,
        %slashing_amount,
        %change_amount,
        "built slashing transaction"
    );

    Ok(UnsignedTx::new(psbt, slashing.min_slashing_tx_fee))
}

#[cfg(test)]
mod tests {
    use bitcoin::taproot::LeafVersion;

    use super::*;
    use crate::{test_utils::staking_terms, transactions::unbonding::build_unbonding_tx};

    fn staking_tx(terms: &StakingTerms, value: Amount) -> Transaction {
        let (address, _) = terms
            .staking_scripts()
            .unwrap()
            .staking_output(terms.network)
            .unwrap();

        create_tx(vec![], create_tx_outs([(address.script_pubkey(), value)]))
    }

    #[test]
    fn test_build_staking_slashing_tx() {
        let terms = staking_terms(100);
        let staking_tx = staking_tx(&terms, Amount::from_sat(10_000));

        let unsigned = build_staking_slashing_tx(&terms, &staking_tx).unwrap();
        assert_eq!(unsigned.fee(), Amount::from_sat(300));

        let tx = &unsigned.psbt().unsigned_tx;
        assert_eq!(tx.input[0].sequence, Sequence::MAX);
        assert_eq!(
            tx.input[0].previous_output,
            OutPoint::new(staking_tx.compute_txid(), 0)
        );

        assert_eq!(
            tx.output[0].script_pubkey,
            terms.params.slashing.slashing_pk_script
        );
        assert_eq!(tx.output[0].value, Amount::from_sat(2_000));

        let (change_address, _) = slashing_change_output(
            &terms.staker.public_key,
            terms.params.unbonding_time,
            terms.network,
        )
        .unwrap();
        assert_eq!(tx.output[1].script_pubkey, change_address.script_pubkey());
        assert_eq!(tx.output[1].value, Amount::from_sat(7_700));

        let slashing_leaf = terms.staking_scripts().unwrap().slashing;
        let input = &unsigned.psbt().inputs[0];
        assert!(input
            .tap_scripts
            .values()
            .all(|leaf| *leaf == (slashing_leaf.clone(), LeafVersion::TapScript)));
    }

    #[test]
    fn test_build_unbonding_slashing_tx() {
        let terms = staking_terms(100);
        let staking_tx = staking_tx(&terms, Amount::from_sat(10_000));
        let unbonding_tx = build_unbonding_tx(&terms, &staking_tx)
            .unwrap()
            .into_psbt()
            .unsigned_tx;

        let unsigned = build_unbonding_slashing_tx(&terms, &unbonding_tx).unwrap();

        let tx = &unsigned.psbt().unsigned_tx;
        assert_eq!(
            tx.input[0].previous_output,
            OutPoint::new(unbonding_tx.compute_txid(), 0)
        );
        assert_eq!(tx.output[0].value, Amount::from_sat(1_900));
        assert_eq!(tx.output[1].value, Amount::from_sat(7_300));

        let (unbonding_address, _) = terms
            .unbonding_scripts()
            .unwrap()
            .unbonding_output(terms.network)
            .unwrap();
        assert_eq!(
            unsigned.psbt().inputs[0]
                .witness_utxo
                .as_ref()
                .map(|prevout| &prevout.script_pubkey),
            Some(&unbonding_address.script_pubkey())
        );

        // the staking output is not an unbonding output
        assert!(matches!(
            build_unbonding_slashing_tx(&terms, &staking_tx),
            Err(TxBuilderError::MissingOutput(_))
        ));
    }

    #[test]
    fn test_build_slashing_tx_dust() {
        let terms = staking_terms(100);

        // 20% of 2,000 is 400, at or below dust
        let staking_tx = staking_tx(&terms, Amount::from_sat(2_000));

        assert!(matches!(
            build_staking_slashing_tx(&terms, &staking_tx),
            Err(TxBuilderError::InvalidStakingData(_))
        ));
    }
}

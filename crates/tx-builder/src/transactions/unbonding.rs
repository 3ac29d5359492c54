//! The unbonding transaction that lets the staker exit before the staking term ends.

use babylon_staking_params::default::DUST_THRESHOLD;
use babylon_staking_primitives::{
    scripts::general::{create_tx, create_tx_ins, create_tx_outs},
    types::UnsignedTx,
};
use bitcoin::{OutPoint, Psbt, Sequence, Transaction};
use tracing::debug;

use super::{find_output, set_script_path};
use crate::{
    errors::{TxBuilderError, TxBuilderResult},
    terms::StakingTerms,
};

/// Builds the unbonding transaction that spends the staking output of `staking_tx` through the
/// unbonding leaf.
///
/// The unbonding output pays the stake minus the unbonding fee into an output that keeps the
/// slashing leaf and replaces the staking term with the unbonding time.
pub(crate) fn build_unbonding_tx(
    terms: &StakingTerms,
    staking_tx: &Transaction,
) -> TxBuilderResult<UnsignedTx> {
    let staking_scripts = terms.staking_scripts()?;
    let (staking_address, staking_spend_info) = staking_scripts.staking_output(terms.network)?;

    let (vout, staking_output) =
        find_output(staking_tx, &staking_address.script_pubkey(), "staking output")?;

    let fee = terms.params.unbonding_fee;
    let unbonding_value = staking_output
        .value
        .checked_sub(fee)
        .filter(|value| *value > DUST_THRESHOLD)
        .ok_or_else(|| {
            TxBuilderError::InvalidStakingData(format!(
                "staking value {} cannot cover the unbonding fee {fee}",
                staking_output.value
            ))
        })?;

    let (unbonding_address, _) = terms.unbonding_scripts()?.unbonding_output(terms.network)?;

    let tx_ins = create_tx_ins(
        [OutPoint::new(staking_tx.compute_txid(), vout)],
        Sequence::MAX,
    );
    let tx_outs = create_tx_outs([(unbonding_address.script_pubkey(), unbonding_value)]);

    let mut psbt = Psbt::from_unsigned_tx(create_tx(tx_ins, tx_outs))?;
    set_script_path(
        &mut psbt.inputs[0],
        staking_output.clone(),
        &staking_spend_info,
        &staking_scripts.unbonding,
    )?;

    debug!(
        txid = %psbt.unsigned_tx.compute_txid(),
        %unbonding_value,
        "built unbonding transaction"
    );

    Ok(UnsignedTx::new(psbt, fee))
}

#[cfg(test)]
mod tests {
    use bitcoin::{absolute::LockTime, taproot::LeafVersion, Amount, ScriptBuf};

    use super::*;
    use crate::test_utils::staking_terms;

    fn staking_tx(terms: &StakingTerms, value: Amount) -> Transaction {
        let (address, _) = terms
            .staking_scripts()
            .unwrap()
            .staking_output(terms.network)
            .unwrap();

        create_tx(
            vec![],
            create_tx_outs([
                (ScriptBuf::new(), Amount::from_sat(1_000)),
                (address.script_pubkey(), value),
            ]),
        )
    }

    #[test]
    fn test_build_unbonding_tx() {
        let terms = staking_terms(100);
        let staking_tx = staking_tx(&terms, Amount::from_sat(10_000));

        let unsigned = build_unbonding_tx(&terms, &staking_tx).unwrap();
        assert_eq!(unsigned.fee(), Amount::from_sat(500));

        let tx = &unsigned.psbt().unsigned_tx;
        assert_eq!(tx.lock_time, LockTime::ZERO);
        assert_eq!(tx.input[0].sequence, Sequence::MAX);
        assert_eq!(
            tx.input[0].previous_output,
            OutPoint::new(staking_tx.compute_txid(), 1)
        );

        let (unbonding_address, _) = terms
            .unbonding_scripts()
            .unwrap()
            .unbonding_output(terms.network)
            .unwrap();
        assert_eq!(tx.output.len(), 1);
        assert_eq!(tx.output[0].script_pubkey, unbonding_address.script_pubkey());
        assert_eq!(tx.output[0].value, Amount::from_sat(9_500));

        let input = &unsigned.psbt().inputs[0];
        assert_eq!(input.witness_utxo.as_ref(), Some(&staking_tx.output[1]));

        let unbonding_leaf = terms.staking_scripts().unwrap().unbonding;
        assert_eq!(input.tap_scripts.len(), 1);
        assert!(input
            .tap_scripts
            .values()
            .all(|leaf| *leaf == (unbonding_leaf.clone(), LeafVersion::TapScript)));
    }

    #[test]
    fn test_build_unbonding_tx_missing_output() {
        let terms = staking_terms(100);
        let other_terms = staking_terms(200);
        let staking_tx = staking_tx(&other_terms, Amount::from_sat(10_000));

        assert!(matches!(
            build_unbonding_tx(&terms, &staking_tx),
            Err(TxBuilderError::MissingOutput(_))
        ));
    }

    #[test]
    fn test_build_unbonding_tx_dust() {
        let terms = staking_terms(100);
        let staking_tx = staking_tx(&terms, Amount::from_sat(1_000));

        assert!(matches!(
            build_unbonding_tx(&terms, &staking_tx),
            Err(TxBuilderError::InvalidStakingData(_))
        ));
    }
}

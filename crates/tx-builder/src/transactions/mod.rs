//! The individual transactions of a delegation.

pub mod slashing;
pub mod staking;
pub mod unbonding;
pub mod withdrawal;

use babylon_staking_primitives::scripts::taproot::control_block_for;
use bitcoin::{
    psbt::Input,
    taproot::{LeafVersion, TaprootSpendInfo},
    Script, ScriptBuf, Transaction, TxOut,
};

use crate::errors::{TxBuilderError, TxBuilderResult};

/// Finds the output of `tx` locked by `script_pubkey`.
pub(crate) fn find_output<'tx>(
    tx: &'tx Transaction,
    script_pubkey: &Script,
    what: &str,
) -> TxBuilderResult<(u32, &'tx TxOut)> {
    tx.output
        .iter()
        .enumerate()
        .find(|(_, output)| output.script_pubkey.as_script() == script_pubkey)
        .map(|(vout, output)| (vout as u32, output))
        .ok_or_else(|| TxBuilderError::MissingOutput(format!("{what} in {}", tx.compute_txid())))
}

/// Fills a PSBT input that spends `prevout` through `leaf` of the tree described by `spend_info`.
pub(crate) fn set_script_path(
    input: &mut Input,
    prevout: TxOut,
    spend_info: &TaprootSpendInfo,
    leaf: &ScriptBuf,
) -> TxBuilderResult<()> {
    let control_block = control_block_for(spend_info, leaf)?;

    input.witness_utxo = Some(prevout);
    input.tap_internal_key = Some(spend_info.internal_key());
    input.tap_merkle_root = spend_info.merkle_root();
    input
        .tap_scripts
        .insert(control_block, (leaf.clone(), LeafVersion::TapScript));

    Ok(())
}

#[cfg(test)]
mod tests {
    use babylon_staking_primitives::scripts::general::{create_tx, create_tx_outs};
    use bitcoin::Amount;

    use super::*;
    use crate::test_utils::staking_terms;

    #[test]
    fn test_find_output() {
        let terms = staking_terms(100);
        let scripts = terms.staking_scripts().unwrap();
        let (address, _) = scripts.staking_output(terms.network).unwrap();

        let tx = create_tx(
            vec![],
            create_tx_outs([
                (ScriptBuf::new(), Amount::from_sat(1_000)),
                (address.script_pubkey(), Amount::from_sat(2_000)),
            ]),
        );

        let (vout, output) = find_output(&tx, &address.script_pubkey(), "staking output").unwrap();
        assert_eq!(vout, 1);
        assert_eq!(output.value, Amount::from_sat(2_000));

        let other = terms.staker.address.script_pubkey();
        assert!(matches!(
            find_output(&tx, &other, "staking output"),
            Err(TxBuilderError::MissingOutput(_))
        ));
    }
}

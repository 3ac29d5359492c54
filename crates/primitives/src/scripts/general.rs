//! Standalone helpers to assemble transactions out of their parts.

use bitcoin::{
    absolute::LockTime, transaction, Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn,
    TxOut, Witness,
};

/// Create a bitcoin [`Transaction`] for the given inputs and outputs.
pub fn create_tx(tx_ins: Vec<TxIn>, tx_outs: Vec<TxOut>) -> Transaction {
    Transaction {
        version: transaction::Version::TWO,
        lock_time: LockTime::ZERO,
        input: tx_ins,
        output: tx_outs,
    }
}

/// Create a list of [`TxIn`]'s from given [`OutPoint`]'s.
///
/// This wraps the [`OutPoint`] in a structure that includes an empty `witness`, an empty
/// `script_sig` and the given `sequence`.
pub fn create_tx_ins(utxos: impl IntoIterator<Item = OutPoint>, sequence: Sequence) -> Vec<TxIn> {
    utxos
        .into_iter()
        .map(|previous_output| TxIn {
            previous_output,
            sequence,
            script_sig: ScriptBuf::default(),
            witness: Witness::new(),
        })
        .collect()
}

/// Create a list of [`TxOut`]'s' based on pairs of scripts and corresponding amounts.
pub fn create_tx_outs(
    scripts_and_amounts: impl IntoIterator<Item = (ScriptBuf, Amount)>,
) -> Vec<TxOut> {
    scripts_and_amounts
        .into_iter()
        .map(|(script_pubkey, value)| TxOut {
            script_pubkey,
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bitcoin::{hashes::Hash, Txid};

    use super::*;

    #[test]
    fn test_create_tx() {
        let outpoint = OutPoint::new(Txid::all_zeros(), 1);
        let tx_ins = create_tx_ins([outpoint], Sequence::MAX);
        let tx_outs = create_tx_outs([(ScriptBuf::new(), Amount::from_sat(1_000))]);

        let tx = create_tx(tx_ins, tx_outs);

        assert_eq!(tx.version, transaction::Version::TWO);
        assert_eq!(tx.lock_time, LockTime::ZERO);
        assert_eq!(tx.input[0].previous_output, outpoint);
        assert_eq!(tx.input[0].sequence, Sequence::MAX);
        assert!(tx.input[0].witness.is_empty());
        assert_eq!(tx.output[0].value, Amount::from_sat(1_000));
    }
}

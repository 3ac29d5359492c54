//! Strips signatures off a transaction.
//!
//! The staking module stores the transaction templates that were signed, not their broadcast form,
//! so every transaction embedded in a delegation message goes through [`sanitize`] first.

use bitcoin::{consensus, ScriptBuf, Transaction, Witness};

/// Returns a copy of `tx` in which every input has an empty `script_sig` and an empty witness.
///
/// The signed transaction is left untouched so that it can still be broadcast.
pub fn sanitize(tx: &Transaction) -> Transaction {
    let mut sanitized = tx.clone();

    for input in &mut sanitized.input {
        input.script_sig = ScriptBuf::new();
        input.witness = Witness::new();
    }

    sanitized
}

/// The consensus encoding of the sanitized `tx`.
pub fn sanitized_bytes(tx: &Transaction) -> Vec<u8> {
    consensus::serialize(&sanitize(tx))
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        absolute::LockTime, hashes::Hash, transaction, Amount, OutPoint, Sequence, TxIn, TxOut,
        Txid,
    };

    use super::*;

    fn signed_tx() -> Transaction {
        let witness = Witness::from_slice(&[vec![1u8; 64], vec![2u8; 34]]);

        Transaction {
            version: transaction::Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::new(Txid::all_zeros(), 0),
                script_sig: ScriptBuf::from_bytes(vec![0x51]),
                sequence: Sequence::MAX,
                witness,
            }],
            output: vec![TxOut {
                value: Amount::from_sat(1_000),
                script_pubkey: ScriptBuf::new(),
            }],
        }
    }

    #[test]
    fn test_sanitize() {
        let tx = signed_tx();
        let sanitized = sanitize(&tx);

        assert!(sanitized.input[0].witness.is_empty());
        assert!(sanitized.input[0].script_sig.is_empty());
        assert_eq!(sanitized.output, tx.output);

        // the txid commits to the script_sig but not to the witness
        assert_ne!(sanitized.compute_txid(), tx.compute_txid());

        assert_eq!(tx.input[0].witness.len(), 2, "original must not be mutated");
    }

    #[test]
    fn test_sanitize_keeps_segwit_txid() {
        let mut tx = signed_tx();
        tx.input[0].script_sig = ScriptBuf::new();

        let sanitized = sanitize(&tx);

        assert!(sanitized.input[0].witness.is_empty());
        assert_eq!(sanitized.compute_txid(), tx.compute_txid());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let tx = signed_tx();

        let once = sanitize(&tx);
        let twice = sanitize(&once);

        assert_eq!(once, twice);
        assert_eq!(sanitized_bytes(&tx), sanitized_bytes(&once));
    }

    #[test]
    fn test_sanitized_bytes_have_no_witness() {
        let tx = signed_tx();
        let bytes = sanitized_bytes(&tx);

        let decoded: Transaction = consensus::deserialize(&bytes).unwrap();
        assert_eq!(decoded, sanitize(&tx));
        assert_eq!(bytes.len(), decoded.base_size());
    }
}

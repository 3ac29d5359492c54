//! Extraction of the staker's Schnorr signature from a signed slashing transaction.
//!
//! The staking module needs the staker's pre-signature over both slashing transactions. A signer
//! may return it either as a PSBT partial signature or inside a finalized witness, so
//! [`SignatureExtractor`] looks in both places for the signature of a known key over a known leaf.

use bitcoin::{
    secp256k1::schnorr,
    taproot::{LeafVersion, TAPROOT_ANNEX_PREFIX},
    Psbt, Script, TapLeafHash, TapSighashType, Transaction, XOnlyPublicKey,
};

use crate::constants::SCHNORR_SIGNATURE_SIZE;

/// Returns the first 64-byte witness element found by scanning the inputs in order.
///
/// Only the first element of each non-empty witness is considered. This assumes a
/// single-signature witness layout; prefer [`SignatureExtractor`] when the spent leaf is known.
pub fn extract_first_schnorr_signature(tx: &Transaction) -> Option<schnorr::Signature> {
    tx.input
        .iter()
        .filter_map(|input| input.witness.nth(0))
        .find(|element| element.len() == SCHNORR_SIGNATURE_SIZE)
        .and_then(|element| schnorr::Signature::from_slice(element).ok())
}

/// Finds the signature of `signer` over a specific tapscript leaf.
#[derive(Debug, Clone, Copy)]
pub struct SignatureExtractor<'a> {
    signer: XOnlyPublicKey,
    leaf_script: &'a Script,
}

impl<'a> SignatureExtractor<'a> {
    /// Creates an extractor for the signature of `signer` over `leaf_script`.
    pub const fn for_leaf(signer: XOnlyPublicKey, leaf_script: &'a Script) -> Self {
        Self {
            signer,
            leaf_script,
        }
    }

    /// The hash of the leaf being signed.
    pub fn leaf_hash(&self) -> TapLeafHash {
        TapLeafHash::from_script(self.leaf_script, LeafVersion::TapScript)
    }

    /// Looks for the signature in the PSBT first and then in the finalized witnesses of `tx`.
    pub fn extract(&self, psbt: &Psbt, tx: &Transaction) -> Option<schnorr::Signature> {
        self.from_psbt(psbt).or_else(|| self.from_witness(tx))
    }

    /// Looks for a partial signature with the default sighash type in any input of `psbt`.
    pub fn from_psbt(&self, psbt: &Psbt) -> Option<schnorr::Signature> {
        let key = (self.signer, self.leaf_hash());

        psbt.inputs.iter().find_map(|input| {
            input
                .tap_script_sigs
                .get(&key)
                .filter(|sig| sig.sighash_type == TapSighashType::Default)
                .map(|sig| sig.signature)
        })
    }

    /// Looks for a script-path witness that spends the leaf.
    ///
    /// Every staking leaf checks the staker's key first, so the staker's signature is the element
    /// directly beneath the leaf script: `[.., staker_sig, leaf_script, control_block]`.
    pub fn from_witness(&self, tx: &Transaction) -> Option<schnorr::Signature> {
        tx.input.iter().find_map(|input| {
            let mut elements = input.witness.iter().collect::<Vec<_>>();

            if elements.len() >= 2
                && elements
                    .last()
                    .is_some_and(|last| last.first() == Some(&TAPROOT_ANNEX_PREFIX))
            {
                elements.pop();
            }

            let [.., sig, script, _control_block] = elements.as_slice() else {
                return None;
            };

            if *script != self.leaf_script.as_bytes() || sig.len() != SCHNORR_SIGNATURE_SIZE {
                return None;
            }

            schnorr::Signature::from_slice(sig).ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        absolute::LockTime,
        hashes::Hash,
        secp256k1::{Keypair, Message, SECP256K1},
        taproot, transaction, Amount, OutPoint, ScriptBuf, Sequence, TxIn, TxOut, Txid, Witness,
    };

    use super::*;

    fn keypair(i: u8) -> Keypair {
        Keypair::from_seckey_slice(SECP256K1, &[i; 32]).unwrap()
    }

    fn signature(i: u8) -> schnorr::Signature {
        let msg = Message::from_digest([i; 32]);
        SECP256K1.sign_schnorr_no_aux_rand(&msg, &keypair(i))
    }

    fn tx_with_witnesses(witnesses: Vec<Witness>) -> Transaction {
        Transaction {
            version: transaction::Version::TWO,
            lock_time: LockTime::ZERO,
            input: witnesses
                .into_iter()
                .enumerate()
                .map(|(i, witness)| TxIn {
                    previous_output: OutPoint::new(Txid::all_zeros(), i as u32),
                    script_sig: ScriptBuf::new(),
                    sequence: Sequence::MAX,
                    witness,
                })
                .collect(),
            output: vec![TxOut {
                value: Amount::from_sat(1_000),
                script_pubkey: ScriptBuf::new(),
            }],
        }
    }

    fn leaf() -> ScriptBuf {
        ScriptBuf::from_bytes(vec![0x20; 40])
    }

    #[test]
    fn test_first_schnorr_signature_scan() {
        let sig = signature(1);

        let tx = tx_with_witnesses(vec![
            Witness::new(),
            Witness::from_slice(&[vec![0u8; 71]]),
            Witness::from_slice(&[sig.serialize().to_vec(), vec![1u8; 33]]),
        ]);

        assert_eq!(extract_first_schnorr_signature(&tx), Some(sig));
        assert_eq!(
            extract_first_schnorr_signature(&tx),
            extract_first_schnorr_signature(&tx),
            "extraction must be deterministic"
        );

        let tx = tx_with_witnesses(vec![Witness::new(), Witness::from_slice(&[vec![0u8; 65]])]);
        assert!(extract_first_schnorr_signature(&tx).is_none());
    }

    #[test]
    fn test_extract_from_witness() {
        let staker = keypair(1).x_only_public_key().0;
        let leaf = leaf();
        let sig = signature(1);
        let other = signature(2);
        let control_block = vec![0xc0; 33];

        // a covenant signature precedes the staker's
        let tx = tx_with_witnesses(vec![Witness::from_slice(&[
            other.serialize().to_vec(),
            sig.serialize().to_vec(),
            leaf.to_bytes(),
            control_block.clone(),
        ])]);

        let extractor = SignatureExtractor::for_leaf(staker, &leaf);
        assert_eq!(extractor.from_witness(&tx), Some(sig));
        assert_eq!(extract_first_schnorr_signature(&tx), Some(other));

        let other_leaf = ScriptBuf::from_bytes(vec![0x21; 40]);
        let extractor = SignatureExtractor::for_leaf(staker, &other_leaf);
        assert!(extractor.from_witness(&tx).is_none());
    }

    #[test]
    fn test_extract_from_witness_with_annex() {
        let staker = keypair(1).x_only_public_key().0;
        let leaf = leaf();
        let sig = signature(1);

        let tx = tx_with_witnesses(vec![Witness::from_slice(&[
            sig.serialize().to_vec(),
            leaf.to_bytes(),
            vec![0xc0; 33],
            vec![TAPROOT_ANNEX_PREFIX, 0x01],
        ])]);

        let extractor = SignatureExtractor::for_leaf(staker, &leaf);
        assert_eq!(extractor.from_witness(&tx), Some(sig));
    }

    #[test]
    fn test_extract_prefers_psbt() {
        let staker = keypair(1).x_only_public_key().0;
        let leaf = leaf();
        let sig = signature(1);

        let tx = tx_with_witnesses(vec![Witness::new()]);
        let mut psbt = Psbt::from_unsigned_tx(tx.clone()).unwrap();

        let extractor = SignatureExtractor::for_leaf(staker, &leaf);
        assert!(extractor.extract(&psbt, &tx).is_none());

        psbt.inputs[0].tap_script_sigs.insert(
            (staker, extractor.leaf_hash()),
            taproot::Signature {
                signature: sig,
                sighash_type: TapSighashType::Default,
            },
        );
        assert_eq!(extractor.extract(&psbt, &tx), Some(sig));

        psbt.inputs[0].tap_script_sigs.insert(
            (staker, extractor.leaf_hash()),
            taproot::Signature {
                signature: sig,
                sighash_type: TapSighashType::All,
            },
        );
        assert!(
            extractor.from_psbt(&psbt).is_none(),
            "65-byte signatures are not accepted"
        );
    }
}

//! Sanity checks on the fee paid by a signed transaction.

use bitcoin::{Amount, FeeRate, Transaction};

use crate::errors::FeeSafetyError;

/// Checks that `fee` is within a factor of `tolerance` of what `fee_rate` implies for the signed
/// size of `tx`.
///
/// The builder estimates witness sizes, so the signed transaction is never expected to match the
/// estimate exactly. This only catches gross mis-estimation.
pub fn check_fee_safety(
    tx: &Transaction,
    fee_rate: FeeRate,
    fee: Amount,
    tolerance: u64,
) -> Result<(), FeeSafetyError> {
    let vsize = tx.vsize() as u64;
    let expected = fee_rate
        .fee_vb(vsize)
        .ok_or(FeeSafetyError::Overflow(fee_rate))?;

    let tolerance = tolerance.max(1);

    if fee < expected / tolerance {
        return Err(FeeSafetyError::FeeTooLow {
            fee,
            expected,
            vsize,
            fee_rate,
        });
    }

    let ceiling = expected
        .checked_mul(tolerance)
        .ok_or(FeeSafetyError::Overflow(fee_rate))?;

    if fee > ceiling {
        return Err(FeeSafetyError::FeeTooHigh {
            fee,
            expected,
            vsize,
            fee_rate,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        absolute::LockTime, hashes::Hash, transaction, OutPoint, ScriptBuf, Sequence, TxIn, TxOut,
        Txid, Witness,
    };

    use super::*;

    fn p2tr_like(byte: u8) -> ScriptBuf {
        let mut bytes = vec![0x51, 0x20];
        bytes.extend([byte; 32]);

        ScriptBuf::from_bytes(bytes)
    }

    fn key_spend_tx() -> Transaction {
        Transaction {
            version: transaction::Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::new(Txid::all_zeros(), 0),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::from_slice(&[[7u8; 64]]),
            }],
            output: vec![
                TxOut {
                    value: Amount::from_sat(10_000),
                    script_pubkey: p2tr_like(1),
                },
                TxOut {
                    value: Amount::from_sat(39_000),
                    script_pubkey: p2tr_like(2),
                },
            ],
        }
    }

    #[test]
    fn test_fee_within_tolerance() {
        let tx = key_spend_tx();
        let rate = FeeRate::from_sat_per_vb(5).unwrap();
        let exact = rate.fee_vb(tx.vsize() as u64).unwrap();

        assert!(check_fee_safety(&tx, rate, exact, 2).is_ok());
        assert!(check_fee_safety(&tx, rate, exact + Amount::from_sat(10), 2).is_ok());
        assert!(check_fee_safety(&tx, rate, exact * 2, 2).is_ok());
        assert!(check_fee_safety(&tx, rate, exact / 2, 2).is_ok());
    }

    #[test]
    fn test_fee_out_of_tolerance() {
        let tx = key_spend_tx();
        let rate = FeeRate::from_sat_per_vb(5).unwrap();
        let exact = rate.fee_vb(tx.vsize() as u64).unwrap();

        assert!(matches!(
            check_fee_safety(&tx, rate, exact * 10, 2),
            Err(FeeSafetyError::FeeTooHigh { .. })
        ));
        assert!(matches!(
            check_fee_safety(&tx, rate, exact / 10, 2),
            Err(FeeSafetyError::FeeTooLow { .. })
        ));
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let tx = key_spend_tx();
        let rate = FeeRate::from_sat_per_vb(5).unwrap();
        let exact = rate.fee_vb(tx.vsize() as u64).unwrap();

        assert!(check_fee_safety(&tx, rate, exact * 3, 2).is_err());
        assert!(check_fee_safety(&tx, rate, exact * 3, 4).is_ok());
    }
}

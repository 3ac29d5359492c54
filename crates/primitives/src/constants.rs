//! Constants shared by the script and transaction builders.

use std::sync::LazyLock;

use bitcoin::{secp256k1::PublicKey, Weight, XOnlyPublicKey};

/// The compressed form of the NUMS point used by the staking module as the internal key of every
/// script-only taproot output.
pub const UNSPENDABLE_PUBLIC_KEY_HEX: &str =
    "0250929b74c1a04954b78b4b6035e97a5e078a5a0f28ec96d547bfee9ace803ac0";

/// The x-only internal key that makes the key path of a taproot output unspendable.
pub static UNSPENDABLE_INTERNAL_KEY: LazyLock<XOnlyPublicKey> = LazyLock::new(|| {
    let bytes = hex::decode(UNSPENDABLE_PUBLIC_KEY_HEX).expect("valid hex");

    PublicKey::from_slice(&bytes)
        .expect("valid public key")
        .x_only_public_key()
        .0
});

/// Size of a BIP 340 signature with the default sighash type.
pub const SCHNORR_SIGNATURE_SIZE: usize = 64;

/// Weight added by the segwit marker and flag bytes.
pub const SEGWIT_MARKER_WEIGHT: Weight = Weight::from_wu(2);

/// Witness weight of a P2TR key-path spend: the item count and a single signature.
pub const P2TR_KEY_SPEND_WITNESS_WEIGHT: Weight = Weight::from_wu(1 + 1 + 64);

/// Witness weight of a P2WPKH spend with a worst-case DER signature.
pub const P2WPKH_WITNESS_WEIGHT: Weight = Weight::from_wu(1 + 1 + 72 + 1 + 33);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspendable_key() {
        assert_eq!(
            UNSPENDABLE_INTERNAL_KEY.to_string(),
            "50929b74c1a04954b78b4b6035e97a5e078a5a0f28ec96d547bfee9ace803ac0"
        );
    }
}

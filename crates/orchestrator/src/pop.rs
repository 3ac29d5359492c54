//! The proof that the staker's Bitcoin key is held by the owner of the PoS chain account.

use babylon_staking_proto::babylon::btcstaking::v1::ProofOfPossessionBtc;
use base64::{engine::general_purpose::STANDARD, Engine};
use bitcoin::{secp256k1::PublicKey, Address, CompressedPublicKey, Network};
use sha2::{Digest, Sha256};

use crate::{
    config::{PopMessageMode, SignatureEncoding},
    errors::{StakingError, StakingResult},
};

/// The message the staker signs for `chain_address`.
pub fn pop_message(chain_address: &str, mode: PopMessageMode) -> StakingResult<String> {
    match mode {
        PopMessageMode::Sha256OfAddressBytes => {
            let (_hrp, data) = bech32::decode(chain_address).map_err(|e| {
                StakingError::Encoding(format!("invalid chain address {chain_address}: {e}"))
            })?;

            Ok(hex::encode(Sha256::digest(&data)))
        }
        PopMessageMode::RawAddress => Ok(chain_address.to_string()),
    }
}

/// Decodes the signature string returned by a BIP-322 signer.
pub fn decode_signature(signature: &str, encoding: SignatureEncoding) -> StakingResult<Vec<u8>> {
    let decoded = match encoding {
        SignatureEncoding::Base64 => STANDARD.decode(signature).map_err(|e| e.to_string()),
        SignatureEncoding::Hex => hex::decode(signature).map_err(|e| e.to_string()),
    };

    decoded.map_err(|e| StakingError::Encoding(format!("invalid BIP-322 signature: {e}")))
}

/// The address the BIP-322 signature is made for: the P2WPKH address of the staker's key.
pub fn bip322_address(public_key: PublicKey, network: Network) -> Address {
    Address::p2wpkh(&CompressedPublicKey(public_key), network)
}

/// Assembles the proof of possession from the signer's answer.
pub(crate) fn proof_of_possession(
    public_key: PublicKey,
    network: Network,
    signature: &str,
    encoding: SignatureEncoding,
) -> StakingResult<ProofOfPossessionBtc> {
    let sig = decode_signature(signature, encoding)?;
    let address = bip322_address(public_key, network);

    Ok(ProofOfPossessionBtc::bip322(address.to_string(), sig))
}

#[cfg(test)]
mod tests {
    use babylon_staking_proto::babylon::btcstaking::v1::{Bip322Sig, BtcSigType};
    use babylon_staking_test_utils::{fakes::CHAIN_ADDRESS, fixtures::staker_public_key};
    use prost::Message;

    use super::*;

    #[test]
    fn test_pop_message() {
        assert_eq!(
            pop_message(CHAIN_ADDRESS, PopMessageMode::Sha256OfAddressBytes).unwrap(),
            "7c854a55ff3b6a65ccb68b366a6b39756d8f2994aa41c45f94627209da86806f"
        );
        assert_eq!(
            pop_message(CHAIN_ADDRESS, PopMessageMode::RawAddress).unwrap(),
            CHAIN_ADDRESS
        );

        assert!(matches!(
            pop_message("bbn1notanaddress", PopMessageMode::Sha256OfAddressBytes),
            Err(StakingError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_signature() {
        assert_eq!(
            decode_signature("3q2+7w==", SignatureEncoding::Base64).unwrap(),
            vec![0xde, 0xad, 0xbe, 0xef]
        );
        assert_eq!(
            decode_signature("deadbeef", SignatureEncoding::Hex).unwrap(),
            vec![0xde, 0xad, 0xbe, 0xef]
        );
        assert!(matches!(
            decode_signature("not base64!", SignatureEncoding::Base64),
            Err(StakingError::Encoding(_))
        ));
    }

    #[test]
    fn test_proof_of_possession() {
        let pop = proof_of_possession(
            staker_public_key(),
            Network::Regtest,
            "3q2+7w==",
            SignatureEncoding::Base64,
        )
        .unwrap();
        assert_eq!(pop.btc_sig_type, BtcSigType::Bip322 as i32);

        let sig = Bip322Sig::decode(&pop.btc_sig[..]).unwrap();
        assert!(sig.address.starts_with("bcrt1q"));
        assert_eq!(sig.sig, vec![0xde, 0xad, 0xbe, 0xef]);
    }
}

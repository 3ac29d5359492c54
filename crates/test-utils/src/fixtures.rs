//! Deterministic keys, parameters and generators used across the test suites.

use std::str::FromStr;

use babylon_staking_params::{
    fees::Fees,
    staking::{SlashingParams, StakingParams},
    versions::GlobalParams,
};
use babylon_staking_primitives::{
    scripts::taproot::{create_taproot_addr, SpendPath},
    types::{StakerInfo, Utxo},
};
use bitcoin::{
    hashes::Hash,
    key::rand::{rngs::OsRng, Rng},
    Address, Amount, Network, ScriptBuf, Txid, XOnlyPublicKey,
};
use secp256k1::{Keypair, PublicKey, SECP256K1};

/// The secret key of the staker in every fixture.
pub const STAKER_SECRET_KEY: [u8; 32] = [42; 32];

/// The secret key of the finality provider in every fixture.
pub const FINALITY_PROVIDER_SECRET_KEY: [u8; 32] = [77; 32];

/// The staker's keypair.
pub fn staker_keypair() -> Keypair {
    Keypair::from_seckey_slice(SECP256K1, &STAKER_SECRET_KEY).expect("must be a valid secret key")
}

/// The staker's compressed public key.
pub fn staker_public_key() -> PublicKey {
    staker_keypair().public_key()
}

/// The staker's key-path-only taproot address.
pub fn staker_address(network: Network) -> Address {
    let internal_key = staker_keypair().x_only_public_key().0;

    create_taproot_addr(network, SpendPath::KeySpend { internal_key })
        .expect("must be able to create a key-spend address")
        .0
}

/// The staker as seen by the transaction builder.
pub fn staker_info(network: Network) -> StakerInfo {
    StakerInfo {
        address: staker_address(network),
        public_key: staker_keypair().x_only_public_key().0,
    }
}

/// The finality provider's x-only key.
pub fn finality_provider_key() -> XOnlyPublicKey {
    Keypair::from_seckey_slice(SECP256K1, &FINALITY_PROVIDER_SECRET_KEY)
        .expect("must be a valid secret key")
        .x_only_public_key()
        .0
}

/// `n` distinct covenant keys derived from the secret keys `[1; 32]..=[n; 32]`.
pub fn covenant_keys(n: u8) -> Vec<XOnlyPublicKey> {
    (1..=n)
        .map(|i| {
            Keypair::from_seckey_slice(SECP256K1, &[i; 32])
                .expect("must be a valid secret key")
                .x_only_public_key()
                .0
        })
        .collect()
}

/// A parameter version with the given number and activation height.
///
/// Five covenant keys with a quorum of three, an unbonding time of 20 blocks with a 500 sat fee,
/// 10k sat to 10k BTC of stake for 100 to 60,000 blocks and a 20% slashing rate.
pub fn params_at(version: u32, activation_height: u64) -> StakingParams {
    StakingParams {
        version,
        activation_height,
        covenant_pks: covenant_keys(5),
        covenant_quorum: 3,
        unbonding_time: 20,
        unbonding_fee: Amount::from_sat(500),
        min_staking_amount: Amount::from_sat(10_000),
        max_staking_amount: Amount::from_sat(1_000_000_000_000),
        min_staking_time: 100,
        max_staking_time: 60_000,
        confirmation_depth: 10,
        slashing: SlashingParams {
            slashing_pk_script: ScriptBuf::from_hex("0014d34d787fcef6f3771ad9a6f6d1ad5a6f9d1c73b7")
                .expect("must be valid hex"),
            slashing_rate: FromStr::from_str("0.2").expect("must be a valid decimal"),
            min_slashing_tx_fee: Amount::from_sat(300),
        },
    }
}

/// The parameter version used by the end-to-end scenarios.
pub fn params() -> StakingParams {
    params_at(0, 100)
}

/// Two versions activating at heights 100 and 1,000.
pub fn global_params() -> GlobalParams {
    GlobalParams::new(vec![params_at(0, 100), params_at(1, 1_000)])
        .expect("must be valid global params")
}

/// A fee snapshot whose fastest tier is `fastest_fee`.
pub fn fees(fastest_fee: u64) -> Fees {
    Fees {
        fastest_fee,
        half_hour_fee: fastest_fee.saturating_sub(1).max(1),
        hour_fee: fastest_fee.saturating_sub(2).max(1),
        economy_fee: 1,
        minimum_fee: 1,
    }
}

/// Generates a random transaction ID.
pub fn generate_txid() -> Txid {
    let mut txid = [0u8; 32];
    OsRng.fill(&mut txid);

    Txid::from_slice(&txid).expect("should be able to generate arbitrary txid")
}

/// Generates a UTXO of `value` locked by `script_pubkey` in a random transaction.
pub fn generate_utxo(value: Amount, script_pubkey: ScriptBuf) -> Utxo {
    Utxo {
        txid: generate_txid(),
        vout: OsRng.gen_range(0..8),
        value,
        script_pubkey,
    }
}

/// Generates a UTXO of `value` that belongs to the staker on regtest.
pub fn staker_utxo(value: Amount) -> Utxo {
    generate_utxo(value, staker_address(Network::Regtest).script_pubkey())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_consistent() {
        let params = params();
        assert!(params.validate().is_ok());
        assert!(!params.covenant_pks.contains(&finality_provider_key()));
        assert_ne!(staker_info(Network::Regtest).public_key, finality_provider_key());

        assert!(staker_address(Network::Regtest).script_pubkey().is_p2tr());
        assert_eq!(
            global_params().version_at_height(500).map(|p| p.version),
            Some(0)
        );
    }
}

//! Configuration of the orchestrators.
//!
//! Every field has a default so a partial TOML file is enough:
//!
//! ```toml
//! [gas]
//! multiplier = 2
//!
//! [btc]
//! network = "signet"
//! ```

use bitcoin::Network;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration of the delegation and withdrawal orchestrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// How the PoS chain transaction is paid for.
    pub gas: GasConfig,

    /// The Bitcoin side of the flow.
    pub btc: BtcConfig,

    /// How the proof of possession is produced.
    pub pop: PopConfig,

    /// The order in which the two chains are broadcast to.
    pub broadcast: BroadcastConfig,
}

/// How the PoS chain transaction is paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    /// Factor applied to the simulated gas to obtain the gas limit.
    pub multiplier: Decimal,

    /// Price of a unit of gas in `denom`.
    pub price: Decimal,

    /// The denomination the fee is paid in.
    pub denom: String,

    /// The memo attached to the transaction and its simulation.
    pub memo: String,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            multiplier: Decimal::new(15, 1),
            price: Decimal::new(1, 2),
            denom: "ubbn".to_string(),
            memo: "estimate fee".to_string(),
        }
    }
}

/// The Bitcoin side of the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BtcConfig {
    /// The network the staker's coins live on.
    pub network: Network,

    /// How far the fee of a signed transaction may stray from its rate, as a factor.
    pub fee_tolerance: u64,
}

impl Default for BtcConfig {
    fn default() -> Self {
        Self {
            network: Network::Bitcoin,
            fee_tolerance: 2,
        }
    }
}

/// How the proof of possession is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopConfig {
    /// What the staker signs.
    pub message_mode: PopMessageMode,

    /// How the signer encodes its BIP-322 signature.
    pub signature_encoding: SignatureEncoding,
}

/// What the staker signs to prove possession of the Bitcoin key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopMessageMode {
    /// The hex-encoded SHA-256 of the bytes behind the bech32 chain address.
    #[default]
    Sha256OfAddressBytes,

    /// The bech32 chain address itself.
    RawAddress,
}

/// How a signer encodes the BIP-322 signature it returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureEncoding {
    /// Standard base64 with padding.
    #[default]
    Base64,

    /// Lowercase or uppercase hex.
    Hex,
}

/// The order in which the two chains are broadcast to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Which chain receives its transaction first.
    pub order: BroadcastOrder,
}

/// Which chain receives its transaction first.
///
/// Either way, the staking transaction's fee is checked before anything is broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastOrder {
    /// Submit the delegation to the PoS chain, then push the staking transaction.
    #[default]
    ChainFirst,

    /// Push the staking transaction, then submit the delegation to the PoS chain.
    BitcoinFirst,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();

        assert_eq!(config.gas.multiplier.to_string(), "1.5");
        assert_eq!(config.gas.price.to_string(), "0.01");
        assert_eq!(config.gas.denom, "ubbn");
        assert_eq!(config.gas.memo, "estimate fee");
        assert_eq!(config.btc.fee_tolerance, 2);
        assert_eq!(config.pop.message_mode, PopMessageMode::Sha256OfAddressBytes);
        assert_eq!(config.pop.signature_encoding, SignatureEncoding::Base64);
        assert_eq!(config.broadcast.order, BroadcastOrder::ChainFirst);
    }

    #[test]
    fn test_partial_toml() {
        let config: OrchestratorConfig = toml::from_str(
            r#"
            [gas]
            multiplier = 2
            price = "0.025"

            [btc]
            network = "signet"

            [pop]
            message_mode = "raw_address"

            [broadcast]
            order = "bitcoin_first"
            "#,
        )
        .unwrap();

        assert_eq!(config.gas.multiplier, Decimal::from(2));
        assert_eq!(config.gas.price, Decimal::new(25, 3));
        assert_eq!(config.gas.denom, "ubbn");
        assert_eq!(config.btc.network, Network::Signet);
        assert_eq!(config.btc.fee_tolerance, 2);
        assert_eq!(config.pop.message_mode, PopMessageMode::RawAddress);
        assert_eq!(config.pop.signature_encoding, SignatureEncoding::Base64);
        assert_eq!(config.broadcast.order, BroadcastOrder::BitcoinFirst);
    }
}

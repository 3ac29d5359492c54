//! Types exchanged with the PoS chain.

use serde::{Deserialize, Serialize};

/// An amount of a chain denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// The denomination, e.g. `ubbn`.
    pub denom: String,

    /// The amount as a decimal string.
    pub amount: String,
}

/// The fee attached to a chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    /// The fee paid.
    pub amount: Vec<Coin>,

    /// The gas limit.
    pub gas: u64,
}

/// The outcome of broadcasting a chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTxResponse {
    /// Zero on success, the ABCI error code otherwise.
    pub code: u32,

    /// The hash of the chain transaction.
    #[serde(alias = "txhash")]
    pub transaction_hash: String,

    /// The log reported by the chain, which carries the reason of a failure.
    #[serde(default)]
    pub raw_log: Option<String>,

    /// The gas consumed.
    #[serde(default)]
    pub gas_used: u64,

    /// The gas limit.
    #[serde(default)]
    pub gas_wanted: u64,
}

impl ChainTxResponse {
    /// Whether the chain accepted the transaction.
    pub const fn is_ok(&self) -> bool {
        self.code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_tx_response_serde() {
        let json = r#"{
            "code": 5,
            "transactionHash": "ABCDEF",
            "rawLog": "insufficient funds",
            "gasUsed": 100,
            "gasWanted": 120
        }"#;

        let response: ChainTxResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_ok());
        assert_eq!(response.raw_log.as_deref(), Some("insufficient funds"));

        let json = r#"{ "code": 0, "txhash": "ABCDEF" }"#;
        let response: ChainTxResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.transaction_hash, "ABCDEF");
        assert!(response.raw_log.is_none());
    }
}

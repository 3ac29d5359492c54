//! A client for a mempool.space compatible block explorer.

use std::str::FromStr;

use babylon_staking_params::fees::Fees;
use babylon_staking_wallet_proto::{BtcBroadcaster, FeeEstimator, ProviderResult};
use bitcoin::Txid;
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::{
    config::ApiConfig,
    errors::{ApiError, ApiResult},
};

/// Reads fee rates from and broadcasts transactions through a block explorer.
#[derive(Debug, Clone)]
pub struct MempoolClient {
    base_url: String,
    client: Client,
}

impl MempoolClient {
    /// Creates a client for the explorer configured in `config`.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.mempool_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Fetches the recommended fee tiers.
    pub async fn recommended_fees(&self) -> ApiResult<Fees> {
        let url = format!("{}/api/v1/fees/recommended", self.base_url);

        let response = ensure_success(self.client.get(&url).send().await?).await?;
        let fees: Fees = response.json().await?;

        debug!(?fees, "fetched recommended fees");

        Ok(fees)
    }

    /// Broadcasts the hex-encoded transaction and returns the txid reported by the explorer.
    pub async fn broadcast(&self, tx_hex: &str) -> ApiResult<Txid> {
        let url = format!("{}/api/tx", self.base_url);

        let response = self
            .client
            .post(&url)
            .body(tx_hex.to_string())
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;

        let txid = parse_txid(&body)?;
        info!(%txid, "broadcast transaction");

        Ok(txid)
    }
}

/// Turns a non-success response into [`ApiError::Status`].
pub(crate) async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

fn parse_txid(body: &str) -> ApiResult<Txid> {
    Txid::from_str(body.trim()).map_err(|e| ApiError::Parse(format!("txid {body:?}: {e}")))
}

impl FeeEstimator for MempoolClient {
    async fn network_fees(&self) -> ProviderResult<Fees> {
        Ok(self.recommended_fees().await?)
    }
}

impl BtcBroadcaster for MempoolClient {
    async fn push_tx(&self, tx_hex: &str) -> ProviderResult<Txid> {
        Ok(self.broadcast(tx_hex).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fees() {
        let json = r#"{
            "fastestFee": 12,
            "halfHourFee": 10,
            "hourFee": 8,
            "economyFee": 4,
            "minimumFee": 2
        }"#;

        let fees: Fees = serde_json::from_str(json).unwrap();
        assert_eq!(fees.fastest_fee, 12);
        assert_eq!(fees.fee_rates().default_fee_rate, 12);
        assert_eq!(fees.fee_rates().min_fee_rate, 8);
    }

    #[test]
    fn test_parse_txid() {
        let txid = "b5cbe8ea7d3b4e8f1b8b5f0b6d1f06c6f2e5de8e0c0fa3c6ad05fb6e2b1f54a1";

        assert_eq!(parse_txid(&format!("{txid}\n")).unwrap().to_string(), txid);
        assert!(matches!(
            parse_txid("sendrawtransaction RPC error"),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_base_url() {
        let config = ApiConfig {
            mempool_url: "https://mempool.space/signet/".to_string(),
            ..ApiConfig::default()
        };

        let client = MempoolClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://mempool.space/signet");
    }
}

//! A client for the Babylon staking API.

use babylon_staking_params::versions::GlobalParams;
use babylon_staking_primitives::delegation::Delegation;
use babylon_staking_wallet_proto::{ParamsProvider, ProviderResult};
use bitcoin::XOnlyPublicKey;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::ApiConfig,
    errors::ApiResult,
    mempool::ensure_success,
    types::{DataResponse, DelegationResponse, NetworkInfo},
};

/// Reads the parameter versions and the staker's delegations from the staking API.
#[derive(Debug, Clone)]
pub struct StakingApiClient {
    base_url: String,
    client: Client,
}

impl StakingApiClient {
    /// Creates a client for the API configured in `config`.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.staking_api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Fetches and validates every parameter version.
    pub async fn network_params(&self) -> ApiResult<GlobalParams> {
        let response: DataResponse<NetworkInfo> = self.get("/v2/network-info", &[]).await?;
        let versions = response.data.params.staking_params()?;

        Ok(GlobalParams::new(versions)?)
    }

    /// Fetches every delegation of `staker`, following the pagination until the last page.
    pub async fn delegations(&self, staker: &XOnlyPublicKey) -> ApiResult<Vec<Delegation>> {
        let staker_pk_hex = staker.to_string();
        let mut delegations = Vec::new();
        let mut pagination_key = String::new();

        loop {
            let response: DataResponse<Vec<DelegationResponse>> = self
                .get(
                    "/v2/delegations",
                    &[
                        ("staker_pk_hex", staker_pk_hex.as_str()),
                        ("pagination_key", pagination_key.as_str()),
                    ],
                )
                .await?;

            for delegation in response.data {
                delegations.push(Delegation::try_from(delegation)?);
            }

            pagination_key = response.pagination.unwrap_or_default().next_key;
            if pagination_key.is_empty() {
                break;
            }

            debug!(
                %pagination_key,
                fetched = delegations.len(),
                "fetching next page of delegations"
            );
        }

        Ok(delegations)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);

        let response = self.client.get(&url).query(query).send().await?;

        Ok(ensure_success(response).await?.json().await?)
    }
}

impl ParamsProvider for StakingApiClient {
    async fn global_params(&self) -> ProviderResult<GlobalParams> {
        Ok(self.network_params().await?)
    }
}

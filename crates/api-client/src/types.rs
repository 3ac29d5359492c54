//! The payloads served by the staking API and their conversion into the domain types.

use std::str::FromStr;

use babylon_staking_params::staking::{SlashingParams, StakingParams};
use babylon_staking_primitives::delegation::{Delegation, DelegationInfo, DelegationState};
use bitcoin::{consensus, Amount, ScriptBuf, Transaction, Txid, XOnlyPublicKey};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::{ApiError, ApiResult};

/// The envelope of every staking API response.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    /// The payload.
    pub data: T,

    /// The pagination cursor, on paginated endpoints.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// A pagination cursor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    /// The key of the next page, empty on the last page.
    #[serde(default)]
    pub next_key: String,
}

/// The payload of `/v2/network-info`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkInfo {
    /// The parameter versions.
    pub params: NetworkParams,
}

/// The parameter versions of both chains.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkParams {
    /// The staking parameter versions.
    pub bbn: Vec<BbnParams>,

    /// The checkpointing parameter versions.
    #[serde(default)]
    pub btc: Vec<BtcParams>,
}

/// A staking parameter version as served by the API.
#[derive(Debug, Clone, Deserialize)]
#[expect(missing_docs)]
pub struct BbnParams {
    pub version: u32,
    pub covenant_pks: Vec<String>,
    pub covenant_quorum: u32,
    pub min_staking_value_sat: u64,
    pub max_staking_value_sat: u64,
    pub min_staking_time_blocks: u32,
    pub max_staking_time_blocks: u32,
    pub slashing_pk_script: String,
    pub min_slashing_tx_fee_sat: u64,
    pub slashing_rate: String,
    pub unbonding_time_blocks: u32,
    pub unbonding_fee_sat: u64,
    pub btc_activation_height: u64,
}

/// A checkpointing parameter version as served by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct BtcParams {
    /// The version.
    pub version: u32,

    /// The depth at which a Bitcoin transaction is considered confirmed.
    pub btc_confirmation_depth: u32,
}

impl NetworkParams {
    /// Converts every staking version, taking the confirmation depth of the latest checkpointing
    /// version that is not newer than it.
    pub fn staking_params(&self) -> ApiResult<Vec<StakingParams>> {
        self.bbn
            .iter()
            .map(|params| {
                let confirmation_depth = self
                    .btc
                    .iter()
                    .filter(|btc| btc.version <= params.version)
                    .max_by_key(|btc| btc.version)
                    .or_else(|| self.btc.iter().min_by_key(|btc| btc.version))
                    .map(|btc| btc.btc_confirmation_depth)
                    .ok_or_else(|| ApiError::Parse("no btc checkpoint params".to_string()))?;

                params.to_staking_params(confirmation_depth)
            })
            .collect()
    }
}

impl BbnParams {
    /// Converts this version into [`StakingParams`].
    pub fn to_staking_params(&self, confirmation_depth: u32) -> ApiResult<StakingParams> {
        let covenant_pks = self
            .covenant_pks
            .iter()
            .map(|pk| parse_x_only(pk))
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(StakingParams {
            version: self.version,
            activation_height: self.btc_activation_height,
            covenant_pks,
            covenant_quorum: self.covenant_quorum,
            unbonding_time: blocks(self.unbonding_time_blocks)?,
            unbonding_fee: Amount::from_sat(self.unbonding_fee_sat),
            min_staking_amount: Amount::from_sat(self.min_staking_value_sat),
            max_staking_amount: Amount::from_sat(self.max_staking_value_sat),
            min_staking_time: blocks(self.min_staking_time_blocks)?,
            max_staking_time: blocks(self.max_staking_time_blocks)?,
            confirmation_depth,
            slashing: SlashingParams {
                slashing_pk_script: ScriptBuf::from_hex(&self.slashing_pk_script)
                    .map_err(|e| ApiError::Parse(format!("slashing pk script: {e}")))?,
                slashing_rate: Decimal::from_str(&self.slashing_rate)
                    .map_err(|e| ApiError::Parse(format!("slashing rate: {e}")))?,
                min_slashing_tx_fee: Amount::from_sat(self.min_slashing_tx_fee_sat),
            },
        })
    }
}

/// A delegation as served by `/v2/delegations`.
#[derive(Debug, Clone, Deserialize)]
pub struct DelegationResponse {
    /// The finality providers the stake is delegated to.
    pub finality_provider_btc_pks_hex: Vec<String>,

    /// The staking side of the delegation.
    pub delegation_staking: DelegationStaking,

    /// The unbonding side of the delegation.
    #[serde(default)]
    pub delegation_unbonding: Option<DelegationUnbonding>,

    /// The lifecycle state.
    pub state: DelegationState,
}

/// The staking side of a delegation.
#[derive(Debug, Clone, Deserialize)]
pub struct DelegationStaking {
    /// The signed staking transaction.
    pub staking_tx_hex: String,

    /// The txid of the staking transaction.
    pub staking_tx_hash_hex: String,

    /// The staking term in blocks.
    pub staking_timelock: u32,

    /// The Bitcoin height at which the staking transaction was included.
    pub start_height: u64,

    /// The index of the staking output; the staking output comes first unless stated otherwise.
    #[serde(default)]
    pub staking_output_index: u32,
}

/// The unbonding side of a delegation.
#[derive(Debug, Clone, Deserialize)]
pub struct DelegationUnbonding {
    /// The signed unbonding transaction, empty when the delegation was not unbonded.
    #[serde(default)]
    pub unbonding_tx: String,
}

impl TryFrom<DelegationResponse> for Delegation {
    type Error = ApiError;

    fn try_from(response: DelegationResponse) -> Result<Self, Self::Error> {
        let staking = response.delegation_staking;

        let staking_tx: Transaction = consensus::encode::deserialize_hex(&staking.staking_tx_hex)
            .map_err(|e| ApiError::Parse(format!("staking tx: {e}")))?;
        let staking_tx_hash = Txid::from_str(&staking.staking_tx_hash_hex)
            .map_err(|e| ApiError::Parse(format!("staking tx hash: {e}")))?;

        if staking_tx.compute_txid() != staking_tx_hash {
            return Err(ApiError::Parse(format!(
                "staking tx does not hash to {staking_tx_hash}"
            )));
        }

        let finality_provider_pk = response
            .finality_provider_btc_pks_hex
            .first()
            .ok_or_else(|| ApiError::Parse("no finality provider".to_string()))
            .and_then(|pk| parse_x_only(pk))?;

        let unbonding_tx = response
            .delegation_unbonding
            .map(|unbonding| unbonding.unbonding_tx)
            .filter(|tx_hex| !tx_hex.is_empty())
            .map(|tx_hex| {
                consensus::encode::deserialize_hex::<Transaction>(&tx_hex)
                    .map_err(|e| ApiError::Parse(format!("unbonding tx: {e}")))
            })
            .transpose()?;

        let info = DelegationInfo {
            staking_tx_hash,
            staking_tx,
            staking_output_index: staking.staking_output_index,
            start_height: staking.start_height,
            timelock: blocks(staking.staking_timelock)?,
            finality_provider_pk,
            state: response.state,
        };

        Ok(Delegation::new(info, unbonding_tx))
    }
}

fn parse_x_only(pk: &str) -> ApiResult<XOnlyPublicKey> {
    XOnlyPublicKey::from_str(pk).map_err(|e| ApiError::Parse(format!("public key {pk}: {e}")))
}

fn blocks(value: u32) -> ApiResult<u16> {
    u16::try_from(value).map_err(|_| ApiError::Parse(format!("{value} blocks out of range")))
}

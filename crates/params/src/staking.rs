//! Versioned staking parameters such as the covenant committee, the staking amount and time
//! bounds and the slashing conditions.

use std::collections::BTreeSet;

use bitcoin::{Amount, ScriptBuf, XOnlyPublicKey};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{
    default::SLASHING_RATE_DECIMALS,
    errors::{ParamsError, ParamsResult},
};

/// A single version of the staking parameters.
///
/// Each version becomes active at its `activation_height` and stays active until the next version
/// activates. A delegation must satisfy the bounds of the version that is active at the Bitcoin
/// height at which it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    /// The version number.
    pub version: u32,

    /// The Bitcoin height at which this version activates.
    pub activation_height: u64,

    /// The covenant committee.
    pub covenant_pks: Vec<XOnlyPublicKey>,

    /// The number of covenant signatures required to spend a covenant path.
    pub covenant_quorum: u32,

    /// The relative timelock (in blocks) of the unbonding output.
    pub unbonding_time: u16,

    /// The fee paid by the unbonding transaction.
    pub unbonding_fee: Amount,

    /// The smallest amount that can be staked.
    pub min_staking_amount: Amount,

    /// The largest amount that can be staked.
    pub max_staking_amount: Amount,

    /// The shortest staking term in blocks.
    pub min_staking_time: u16,

    /// The longest staking term in blocks.
    pub max_staking_time: u16,

    /// The number of confirmations the staking transaction requires.
    pub confirmation_depth: u32,

    /// The slashing conditions.
    pub slashing: SlashingParams,
}

/// Parameters that dictate the shape of the slashing transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashingParams {
    /// The script that receives the slashed funds.
    pub slashing_pk_script: ScriptBuf,

    /// The portion of the slashed output that is burnt.
    pub slashing_rate: Decimal,

    /// The fee paid by a slashing transaction.
    pub min_slashing_tx_fee: Amount,
}

impl StakingParams {
    /// Checks the internal consistency of this version.
    pub fn validate(&self) -> ParamsResult<()> {
        if self.min_staking_amount > self.max_staking_amount {
            return Err(ParamsError::InvalidAmountRange {
                min: self.min_staking_amount,
                max: self.max_staking_amount,
            });
        }

        if self.min_staking_time > self.max_staking_time {
            return Err(ParamsError::InvalidTimeRange {
                min: self.min_staking_time,
                max: self.max_staking_time,
            });
        }

        let keys = self.covenant_pks.len();
        if self.covenant_quorum == 0 || self.covenant_quorum as usize > keys {
            return Err(ParamsError::InvalidQuorum {
                quorum: self.covenant_quorum,
                keys,
            });
        }

        let mut seen = BTreeSet::new();
        for pk in &self.covenant_pks {
            if !seen.insert(pk) {
                return Err(ParamsError::DuplicateCovenantKey(*pk));
            }
        }

        if !is_rate_valid(self.slashing.slashing_rate) {
            return Err(ParamsError::InvalidSlashingRate(self.slashing.slashing_rate));
        }

        if self.unbonding_fee >= self.min_staking_amount {
            return Err(ParamsError::UnbondingFeeTooHigh {
                fee: self.unbonding_fee,
                min: self.min_staking_amount,
            });
        }

        Ok(())
    }

    /// Whether `amount` lies within `[min_staking_amount, max_staking_amount]`.
    pub fn contains_amount(&self, amount: Amount) -> bool {
        (self.min_staking_amount..=self.max_staking_amount).contains(&amount)
    }

    /// Whether `blocks` lies within `[min_staking_time, max_staking_time]`.
    pub fn contains_staking_time(&self, blocks: u16) -> bool {
        (self.min_staking_time..=self.max_staking_time).contains(&blocks)
    }
}

impl SlashingParams {
    /// Computes the amount sent to the slashing script when an output of `value` is slashed.
    ///
    /// The product is rounded half away from zero.
    pub fn slashing_amount(&self, value: Amount) -> Amount {
        let slashed = (Decimal::from(value.to_sat()) * self.slashing_rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        // the rate is validated to be in (0, 1) so the product always fits.
        Amount::from_sat(slashed.to_u64().unwrap_or_default())
    }
}

/// A slashing rate must lie in `(0, 1)` and carry at most two decimal places.
fn is_rate_valid(rate: Decimal) -> bool {
    if rate <= Decimal::ZERO || rate >= Decimal::ONE {
        return false;
    }

    rate.normalize().scale() <= SLASHING_RATE_DECIMALS
}

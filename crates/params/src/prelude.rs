//! Re-exports of the most commonly used parameter types.

pub use crate::{
    default::DUST_THRESHOLD,
    errors::{ParamsError, ParamsResult},
    fees::{FeeRates, Fees},
    staking::{SlashingParams, StakingParams},
    versions::{GlobalParams, ParamsVersionInfo},
};

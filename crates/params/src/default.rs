//! Default values used when deriving fee rates and validating delegations.

use bitcoin::Amount;

/// Outputs at or below this value are considered dust by the staking module.
pub const DUST_THRESHOLD: Amount = Amount::from_sat(546);

/// Lower bound on the max fee rate offered to the user in sat/vB.
pub(crate) const MIN_MAX_FEE_RATE: u64 = 128;

/// Multiplier applied to the fastest fee tier to compute the max fee rate.
pub(crate) const MAX_FEE_RATE_MULTIPLIER: u64 = 2;

/// Number of decimal places a slashing rate may carry.
pub(crate) const SLASHING_RATE_DECIMALS: u32 = 2;

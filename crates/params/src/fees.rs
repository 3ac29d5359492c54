//! Fee rates observed on the Bitcoin network and the policy that turns them into the rates offered
//! to a staker.

use bitcoin::FeeRate;
use serde::{Deserialize, Serialize};

use crate::default::{MAX_FEE_RATE_MULTIPLIER, MIN_MAX_FEE_RATE};

/// The recommended fee tiers reported by a block explorer, in sat/vB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    /// Fee rate to be included in the next block.
    pub fastest_fee: u64,

    /// Fee rate to be included within half an hour.
    pub half_hour_fee: u64,

    /// Fee rate to be included within an hour.
    pub hour_fee: u64,

    /// Fee rate to be included eventually.
    pub economy_fee: u64,

    /// The minimum relay fee rate.
    pub minimum_fee: u64,
}

/// The range of fee rates that may be used for a transaction, in sat/vB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRates {
    /// The lowest rate that is likely to confirm in reasonable time.
    pub min_fee_rate: u64,

    /// The rate used when the staker does not pick one.
    pub default_fee_rate: u64,

    /// The highest rate that is accepted.
    pub max_fee_rate: u64,
}

impl Fees {
    /// Derives the fee rates offered to the staker.
    ///
    /// The default is the fastest tier, the minimum is the hour tier and the maximum is twice the
    /// fastest tier but never lower than 128 sat/vB.
    pub fn fee_rates(&self) -> FeeRates {
        FeeRates {
            min_fee_rate: self.hour_fee,
            default_fee_rate: self.fastest_fee,
            max_fee_rate: (self.fastest_fee * MAX_FEE_RATE_MULTIPLIER).max(MIN_MAX_FEE_RATE),
        }
    }
}

impl FeeRates {
    /// The default rate as a [`FeeRate`].
    pub fn default_rate(&self) -> Option<FeeRate> {
        FeeRate::from_sat_per_vb(self.default_fee_rate)
    }

    /// Whether `rate` lies within the accepted range.
    pub fn contains(&self, rate: u64) -> bool {
        (self.min_fee_rate..=self.max_fee_rate).contains(&rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rates() {
        let fees = Fees {
            fastest_fee: 20,
            half_hour_fee: 15,
            hour_fee: 10,
            economy_fee: 5,
            minimum_fee: 1,
        };

        let rates = fees.fee_rates();
        assert_eq!(
            rates,
            FeeRates {
                min_fee_rate: 10,
                default_fee_rate: 20,
                max_fee_rate: 128,
            }
        );
        assert!(rates.contains(64));
        assert!(!rates.contains(9));

        let busy = Fees {
            fastest_fee: 100,
            ..fees
        };
        assert_eq!(busy.fee_rates().max_fee_rate, 200);
    }

    #[test]
    fn test_fees_from_mempool_json() {
        let json = r#"{
            "fastestFee": 12,
            "halfHourFee": 9,
            "hourFee": 7,
            "economyFee": 3,
            "minimumFee": 1
        }"#;

        let fees: Fees = serde_json::from_str(json).unwrap();

        assert_eq!(fees.fastest_fee, 12);
        assert_eq!(fees.minimum_fee, 1);
        assert_eq!(
            fees.fee_rates().default_rate(),
            FeeRate::from_sat_per_vb(12)
        );
    }
}

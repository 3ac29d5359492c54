//! The context shared by every transaction of a delegation.

use babylon_staking_params::{default::DUST_THRESHOLD, staking::StakingParams};
use babylon_staking_primitives::{scripts::staking::StakingScripts, types::StakerInfo};
use bitcoin::{Amount, FeeRate, Network, XOnlyPublicKey};

use crate::errors::{TxBuilderError, TxBuilderResult};

/// Who stakes, with whom, under which parameter version and for how long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingTerms {
    /// The Bitcoin network.
    pub network: Network,

    /// The staker.
    pub staker: StakerInfo,

    /// The finality provider the stake is delegated to.
    pub finality_provider: XOnlyPublicKey,

    /// The parameter version the delegation is bound by.
    pub params: StakingParams,

    /// The staking term in blocks.
    pub staking_time: u16,
}

impl StakingTerms {
    /// The scripts of the staking output.
    pub fn staking_scripts(&self) -> TxBuilderResult<StakingScripts> {
        self.scripts(self.staking_time)
    }

    /// The scripts of the unbonding output.
    pub fn unbonding_scripts(&self) -> TxBuilderResult<StakingScripts> {
        self.scripts(self.params.unbonding_time)
    }

    fn scripts(&self, lock_time: u16) -> TxBuilderResult<StakingScripts> {
        Ok(StakingScripts::new(
            &self.staker.public_key,
            &[self.finality_provider],
            &self.params.covenant_pks,
            self.params.covenant_quorum as usize,
            lock_time,
        )?)
    }

    /// Checks that staking `amount` under these terms is allowed by the parameter version.
    pub fn validate_staking(&self, amount: Amount) -> TxBuilderResult<()> {
        let params = &self.params;

        if !params.contains_amount(amount) {
            return Err(TxBuilderError::InvalidStakingData(format!(
                "staking amount {amount} outside of [{}, {}]",
                params.min_staking_amount, params.max_staking_amount
            )));
        }

        if amount <= DUST_THRESHOLD {
            return Err(TxBuilderError::InvalidStakingData(format!(
                "staking amount {amount} is dust"
            )));
        }

        if self.staking_time == 0 || !params.contains_staking_time(self.staking_time) {
            return Err(TxBuilderError::InvalidStakingData(format!(
                "staking time {} outside of [{}, {}]",
                self.staking_time, params.min_staking_time, params.max_staking_time
            )));
        }

        if self.finality_provider == self.staker.public_key {
            return Err(TxBuilderError::InvalidStakingData(
                "finality provider key must differ from the staker key".to_string(),
            ));
        }

        if params.covenant_pks.contains(&self.finality_provider) {
            return Err(TxBuilderError::InvalidStakingData(
                "finality provider key must not be a covenant key".to_string(),
            ));
        }

        Ok(())
    }
}

/// Turns a rate in sat/vB into a [`FeeRate`].
pub(crate) fn fee_rate(sat_per_vb: u64) -> TxBuilderResult<FeeRate> {
    if sat_per_vb == 0 {
        return Err(TxBuilderError::InvalidFeeRate(sat_per_vb));
    }

    FeeRate::from_sat_per_vb(sat_per_vb).ok_or(TxBuilderError::InvalidFeeRate(sat_per_vb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::staking_terms;

    #[test]
    fn test_validate_staking_bounds() {
        let terms = staking_terms(100);

        assert!(terms.validate_staking(Amount::from_sat(10_000)).is_ok());
        assert!(terms
            .validate_staking(Amount::from_sat(1_000_000_000_000))
            .is_ok());

        for amount in [9_999, 5_000_000_000_000] {
            assert!(matches!(
                terms.validate_staking(Amount::from_sat(amount)),
                Err(TxBuilderError::InvalidStakingData(_))
            ));
        }

        for time in [0, 99, 60_001] {
            assert!(matches!(
                staking_terms(time).validate_staking(Amount::from_sat(10_000)),
                Err(TxBuilderError::InvalidStakingData(_))
            ));
        }
    }

    #[test]
    fn test_validate_finality_provider() {
        let mut terms = staking_terms(100);
        terms.finality_provider = terms.staker.public_key;
        assert!(matches!(
            terms.validate_staking(Amount::from_sat(10_000)),
            Err(TxBuilderError::InvalidStakingData(_))
        ));

        let mut terms = staking_terms(100);
        terms.finality_provider = terms.params.covenant_pks[0];
        assert!(matches!(
            terms.validate_staking(Amount::from_sat(10_000)),
            Err(TxBuilderError::InvalidStakingData(_))
        ));
    }

    #[test]
    fn test_fee_rate() {
        assert!(matches!(fee_rate(0), Err(TxBuilderError::InvalidFeeRate(0))));
        assert_eq!(fee_rate(5).unwrap(), FeeRate::from_sat_per_vb_unchecked(5));
        assert!(matches!(
            fee_rate(u64::MAX),
            Err(TxBuilderError::InvalidFeeRate(_))
        ));
    }
}

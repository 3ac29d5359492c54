use babylon_staking_test_utils::fixtures::{finality_provider_key, params, staker_info};
use bitcoin::Network;

use crate::terms::StakingTerms;

pub(crate) fn staking_terms(staking_time: u16) -> StakingTerms {
    StakingTerms {
        network: Network::Regtest,
        staker: staker_info(Network::Regtest),
        finality_provider: finality_provider_key(),
        params: params(),
        staking_time,
    }
}

//! Turning a gas simulation into the fee of a PoS chain transaction.

use babylon_staking_wallet_proto::{Coin, StdFee};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    config::GasConfig,
    errors::{StakingError, StakingResult},
};

/// Computes the fee for a transaction whose simulation used `simulated_gas`.
///
/// The gas limit is `ceil(simulated_gas × multiplier)` and the fee is `ceil(gas limit × price)`.
/// Simulations are advisory, so a multiplier below one is refused.
pub fn estimate_fee(simulated_gas: u64, config: &GasConfig) -> StakingResult<StdFee> {
    if config.multiplier < Decimal::ONE {
        return Err(StakingError::InvalidConfig(format!(
            "gas multiplier {} is below 1",
            config.multiplier
        )));
    }

    if config.price.is_sign_negative() {
        return Err(StakingError::InvalidConfig(format!(
            "gas price {} is negative",
            config.price
        )));
    }

    let gas = ceil_mul(Decimal::from(simulated_gas), config.multiplier)?;
    let amount = ceil_mul(Decimal::from(gas), config.price)?;

    Ok(StdFee {
        amount: vec![Coin {
            denom: config.denom.clone(),
            amount: amount.to_string(),
        }],
        gas,
    })
}

fn ceil_mul(lhs: Decimal, rhs: Decimal) -> StakingResult<u64> {
    lhs.checked_mul(rhs)
        .and_then(|product| product.ceil().to_u64())
        .ok_or_else(|| StakingError::InvalidConfig(format!("{lhs} × {rhs} overflows")))
}

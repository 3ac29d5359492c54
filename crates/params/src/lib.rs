//! This crate contains the parameters that dictate how a BTC delegation must be constructed: the
//! versioned staking parameters published by the staking module and the fee rates observed on the
//! Bitcoin network.

pub mod default;
pub mod errors;
pub mod fees;
pub mod prelude;
pub mod staking;
pub mod versions;

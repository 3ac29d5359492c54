//! Bitcoin scripts.

pub mod general;
pub mod staking;
pub mod taproot;

//! HTTP implementations of the data providers and the Bitcoin broadcaster.
//!
//! [`MempoolClient`](mempool::MempoolClient) talks to a mempool.space compatible block explorer
//! for fee rates and broadcasting. [`StakingApiClient`](staking::StakingApiClient) talks to the
//! Babylon staking API for the parameter versions and the staker's delegations.

pub mod config;
pub mod errors;
pub mod mempool;
pub mod staking;
pub mod types;

//! The delegation-creation and withdrawal protocols of Babylon BTC staking.
//!
//! - [`DelegationOrchestrator`](delegation::DelegationOrchestrator) drives the staker's wallet
//!   through the signatures required by a new delegation, assembles the `MsgCreateBTCDelegation`
//!   and broadcasts to both chains.
//! - [`WithdrawalOrchestrator`](withdrawal::WithdrawalOrchestrator) returns the funds of an expired
//!   or early-unbonded delegation to the staker.
//!
//! Both are generic over the collaborators defined in `babylon-staking-wallet-proto` and hold no
//! state between attempts.

pub mod config;
pub mod delegation;
pub mod errors;
pub mod gas;
pub mod pop;
pub mod state;
pub mod withdrawal;

mod signing;

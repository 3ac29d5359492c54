//! This crate provides test-utilities shared by the staking crates: deterministic key and
//! parameter fixtures, a wallet that really signs PSBTs and in-memory stand-ins for the PoS chain
//! and the data providers.

pub mod fakes;
pub mod fixtures;
pub mod prelude;
pub mod wallet;

//! Re-exports of the fixtures, the test wallet and the fakes.

pub use crate::{
    fakes::{FakeChain, FakeProvider, Submission, CHAIN_ADDRESS},
    fixtures::*,
    wallet::{ScriptSpendMode, TestWallet},
};

//! Builds the unsigned Bitcoin transactions of a Babylon delegation.
//!
//! Every transaction is returned as an
//! [`UnsignedTx`](babylon_staking_primitives::types::UnsignedTx) whose [`Psbt`](bitcoin::Psbt)
//! carries everything a signer needs: the previous outputs and, for script-path spends, the leaf
//! being spent along with its control block.

pub mod builder;
pub mod errors;
pub mod prelude;
pub mod terms;
pub mod transactions;

#[cfg(test)]
mod test_utils;

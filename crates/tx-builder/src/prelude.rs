//! Re-exports of the builder trait, its implementation and the types it works with.

pub use crate::{
    builder::{BabylonTxBuilder, TransactionBuilder},
    errors::{TxBuilderError, TxBuilderResult},
    terms::StakingTerms,
};

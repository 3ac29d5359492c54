//! The interfaces that the staking orchestrators require from the outside world: a Bitcoin
//! signer, a Bitcoin broadcaster, a connected PoS chain account and the parameter and fee
//! providers.
//!
//! Nothing in this crate holds session state. Every collaborator is handed to the orchestrators
//! explicitly.

pub mod chain;
pub mod errors;
pub mod traits;

pub use chain::{ChainTxResponse, Coin, StdFee};
pub use errors::{ProviderError, ProviderResult, WalletError, WalletResult};
pub use traits::{BtcBroadcaster, BtcSigner, ChainClient, FeeEstimator, ParamsProvider};

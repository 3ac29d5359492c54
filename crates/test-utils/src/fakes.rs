//! In-memory stand-ins for the PoS chain account and the data providers.

use std::sync::Arc;

use babylon_staking_params::{fees::Fees, versions::GlobalParams};
use babylon_staking_wallet_proto::{
    ChainClient, ChainTxResponse, FeeEstimator, ParamsProvider, ProviderError, ProviderResult,
    StdFee, WalletError, WalletResult,
};
use parking_lot::Mutex;
use prost_types::Any;

use crate::fixtures::{fees, global_params};

/// The chain address of the connected account: the bech32 encoding of twenty `0x11` bytes.
pub const CHAIN_ADDRESS: &str = "bbn1zyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3krxndk";

/// A message submitted to [`FakeChain`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The signer of the transaction.
    pub signer: String,

    /// The messages carried.
    pub msgs: Vec<Any>,

    /// The fee attached.
    pub fee: StdFee,

    /// The memo attached.
    pub memo: String,
}

/// A PoS chain account that accepts (or rejects) everything it is sent.
#[derive(Debug, Clone)]
pub struct FakeChain {
    connected: bool,
    gas_used: u64,
    code: u32,
    raw_log: Option<String>,
    simulations: Arc<Mutex<Vec<Vec<Any>>>>,
    submissions: Arc<Mutex<Vec<Submission>>>,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            connected: true,
            gas_used: 200_000,
            code: 0,
            raw_log: None,
            simulations: Arc::default(),
            submissions: Arc::default(),
        }
    }
}

impl FakeChain {
    /// A connected account whose transactions succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// An account without a session.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::default()
        }
    }

    /// Makes every simulation report `gas_used`.
    pub fn with_gas_used(mut self, gas_used: u64) -> Self {
        self.gas_used = gas_used;
        self
    }

    /// Makes every broadcast fail on-chain with `code` and `raw_log`.
    pub fn rejecting(mut self, code: u32, raw_log: impl Into<String>) -> Self {
        self.code = code;
        self.raw_log = Some(raw_log.into());
        self
    }

    /// The messages simulated so far.
    pub fn simulations(&self) -> Vec<Vec<Any>> {
        self.simulations.lock().clone()
    }

    /// The transactions submitted so far.
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().clone()
    }

    fn ensure_connected(&self) -> WalletResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(WalletError::NotConnected)
        }
    }
}

impl ChainClient for FakeChain {
    async fn account_address(&self) -> WalletResult<String> {
        self.ensure_connected()?;

        Ok(CHAIN_ADDRESS.to_string())
    }

    async fn simulate(&self, _signer: &str, msgs: &[Any], _memo: &str) -> WalletResult<u64> {
        self.ensure_connected()?;
        self.simulations.lock().push(msgs.to_vec());

        Ok(self.gas_used)
    }

    async fn sign_and_broadcast(
        &self,
        signer: &str,
        msgs: &[Any],
        fee: &StdFee,
        memo: &str,
    ) -> WalletResult<ChainTxResponse> {
        self.ensure_connected()?;

        let mut submissions = self.submissions.lock();
        submissions.push(Submission {
            signer: signer.to_string(),
            msgs: msgs.to_vec(),
            fee: fee.clone(),
            memo: memo.to_string(),
        });

        Ok(ChainTxResponse {
            code: self.code,
            transaction_hash: format!("{:064X}", submissions.len()),
            raw_log: self.raw_log.clone(),
            gas_used: self.gas_used,
            gas_wanted: fee.gas,
        })
    }
}

/// A provider serving fixed fees and parameters, or failing.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    fees: Option<Fees>,
    params: Option<GlobalParams>,
    requests: Arc<Mutex<usize>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            fees: Some(fees(5)),
            params: Some(global_params()),
            requests: Arc::default(),
        }
    }
}

impl FakeProvider {
    /// A provider serving `fees` and `params`.
    pub fn new(fees: Fees, params: GlobalParams) -> Self {
        Self {
            fees: Some(fees),
            params: Some(params),
            requests: Arc::default(),
        }
    }

    /// A provider that cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            fees: None,
            params: None,
            requests: Arc::default(),
        }
    }

    /// The number of requests served so far.
    pub fn requests(&self) -> usize {
        *self.requests.lock()
    }

    fn serve<T: Clone>(&self, value: &Option<T>) -> ProviderResult<T> {
        *self.requests.lock() += 1;

        value
            .clone()
            .ok_or_else(|| ProviderError::Transport("connection refused".to_string()))
    }
}

impl FeeEstimator for FakeProvider {
    async fn network_fees(&self) -> ProviderResult<Fees> {
        self.serve(&self.fees)
    }
}

impl ParamsProvider for FakeProvider {
    async fn global_params(&self) -> ProviderResult<GlobalParams> {
        self.serve(&self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_chain() {
        let chain = FakeChain::new().with_gas_used(1_000);
        assert_eq!(chain.account_address().await.unwrap(), CHAIN_ADDRESS);
        assert_eq!(chain.simulate(CHAIN_ADDRESS, &[], "").await.unwrap(), 1_000);

        let fee = StdFee {
            amount: vec![],
            gas: 1_500,
        };
        let response = chain
            .sign_and_broadcast(CHAIN_ADDRESS, &[], &fee, "memo")
            .await
            .unwrap();
        assert!(response.is_ok());
        assert_eq!(chain.submissions().len(), 1);

        let chain = FakeChain::new().rejecting(5, "insufficient funds");
        let response = chain
            .sign_and_broadcast(CHAIN_ADDRESS, &[], &fee, "memo")
            .await
            .unwrap();
        assert_eq!(response.code, 5);

        assert_eq!(
            FakeChain::disconnected().account_address().await,
            Err(WalletError::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_fake_provider() {
        let provider = FakeProvider::default();
        assert_eq!(provider.network_fees().await.unwrap().fastest_fee, 5);
        assert!(provider.global_params().await.is_ok());
        assert_eq!(provider.requests(), 2);

        assert!(matches!(
            FakeProvider::unreachable().network_fees().await,
            Err(ProviderError::Transport(_))
        ));
    }
}

//! The withdrawal protocol.
//!
//! Once a delegation's staking term expires, or once it has been unbonded early, the staker spends
//! the locked output back to their own address through its timelock leaf.

use babylon_staking_primitives::{
    delegation::{find_delegation, Delegation},
    fees::check_fee_safety,
    types::SigningStep,
};
use babylon_staking_tx_builder::prelude::{StakingTerms, TransactionBuilder};
use babylon_staking_wallet_proto::{BtcBroadcaster, BtcSigner, FeeEstimator, ParamsProvider};
use bitcoin::{consensus, Amount, FeeRate, Txid};
use tracing::{debug, error, info};

use crate::{
    config::OrchestratorConfig,
    errors::{StakingError, StakingResult, WithdrawalFailure},
    signing::{ensure_finalized, read_staker, sign_psbt},
    state::WithdrawalStage,
};

/// The message attached to a failed withdrawal signature.
pub const WITHDRAWAL_SIGNING_FAILED: &str = "Failed to sign PSBT for the withdrawal transaction";

/// The outcome of a successful withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    /// The txid of the withdrawal transaction.
    pub txid: Txid,

    /// The fee paid.
    pub fee: Amount,

    /// The fee rate the transaction was built for, in sat/vB.
    pub fee_rate: u64,
}

/// Withdraws the funds of a known delegation back to the staker.
#[derive(Debug, Clone)]
pub struct WithdrawalOrchestrator<B, S, P, F, Q> {
    builder: B,
    signer: S,
    broadcaster: P,
    fee_estimator: F,
    params_provider: Q,
    config: OrchestratorConfig,
}

impl<B, S, P, F, Q> WithdrawalOrchestrator<B, S, P, F, Q>
where
    B: TransactionBuilder,
    S: BtcSigner,
    P: BtcBroadcaster,
    F: FeeEstimator,
    Q: ParamsProvider,
{
    /// Creates an orchestrator over the given collaborators.
    pub const fn new(
        builder: B,
        signer: S,
        broadcaster: P,
        fee_estimator: F,
        params_provider: Q,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            builder,
            signer,
            broadcaster,
            fee_estimator,
            params_provider,
            config,
        }
    }

    /// Withdraws the delegation among `delegations` whose staking transaction is
    /// `staking_tx_hash`.
    ///
    /// A delegation that was unbonded early is withdrawn from its unbonding output, any other one
    /// from its staking output.
    pub async fn withdraw(
        &self,
        delegations: &[Delegation],
        staking_tx_hash: &Txid,
    ) -> Result<WithdrawalReceipt, WithdrawalFailure> {
        let mut stage = WithdrawalStage::Init;

        match self.run(&mut stage, delegations, staking_tx_hash).await {
            Ok(receipt) => Ok(receipt),
            Err(error) => {
                error!(%stage, %error, %staking_tx_hash, "withdrawal failed");

                Err(WithdrawalFailure {
                    last_stage: stage,
                    error,
                })
            }
        }
    }

    async fn run(
        &self,
        stage: &mut WithdrawalStage,
        delegations: &[Delegation],
        staking_tx_hash: &Txid,
    ) -> StakingResult<WithdrawalReceipt> {
        let delegation = find_delegation(delegations, staking_tx_hash)
            .ok_or(StakingError::DelegationNotFound(*staking_tx_hash))?;
        let info = delegation.info();

        let (global_params, fees) = tokio::try_join!(
            self.params_provider.global_params(),
            self.fee_estimator.network_fees()
        )?;

        let params = global_params
            .version_at_height(info.start_height)
            .ok_or(StakingError::ParameterVersionNotFound(info.start_height))?
            .clone();
        debug!(
            version = params.version,
            start_height = info.start_height,
            "resolved parameter version"
        );

        let (_, staker) = read_staker(&self.signer, self.config.btc.network).await?;
        let terms = StakingTerms {
            network: self.config.btc.network,
            staker,
            finality_provider: info.finality_provider_pk,
            params,
            staking_time: info.timelock,
        };
        advance(stage, WithdrawalStage::ParamsResolved);

        let fee_rate = fees.fee_rates().default_fee_rate;
        let unsigned = match delegation {
            Delegation::Timelock(delegation) => self
                .builder
                .build_withdrawal_timelock_expired(&terms, delegation, fee_rate)?,
            Delegation::Unbonded(delegation) => self
                .builder
                .build_withdrawal_early_unbonded(&terms, delegation, fee_rate)?,
        };
        let fee = unsigned.fee();
        advance(stage, WithdrawalStage::WithdrawalBuilt);

        let step = SigningStep::Withdrawal;
        let signed = sign_psbt(&self.signer, step, unsigned)
            .await
            .and_then(|signed| ensure_finalized(step, &signed).map(|_| signed))
            .map_err(|err| match err {
                StakingError::SigningRejected { step, reason } => StakingError::SigningRejected {
                    step,
                    reason: format!("{WITHDRAWAL_SIGNING_FAILED}: {reason}"),
                },
                err => err,
            })?;
        advance(stage, WithdrawalStage::WithdrawalSigned);

        let rate =
            FeeRate::from_sat_per_vb(fee_rate).ok_or(StakingError::InvalidFeeRate(fee_rate))?;
        check_fee_safety(&signed.tx, rate, fee, self.config.btc.fee_tolerance)?;
        advance(stage, WithdrawalStage::FeeChecked);

        let txid = signed.tx.compute_txid();
        self.broadcaster
            .push_tx(&consensus::encode::serialize_hex(&signed.tx))
            .await
            .map_err(|reason| StakingError::BtcBroadcastFailed {
                chain_tx_hash: None,
                reason,
            })?;
        advance(stage, WithdrawalStage::Broadcast);

        info!(%txid, %fee, fee_rate, "withdrawal broadcast");
        advance(stage, WithdrawalStage::Done);

        Ok(WithdrawalReceipt {
            txid,
            fee,
            fee_rate,
        })
    }
}

fn advance(stage: &mut WithdrawalStage, next: WithdrawalStage) {
    debug!(from = %stage, to = %next, "withdrawal advanced");
    *stage = next;
}

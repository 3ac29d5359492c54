//! The delegation-creation protocol.
//!
//! A delegation is created by driving the staker's wallet through four PSBT signatures and one
//! BIP-322 signature, assembling a [`MsgCreateBtcDelegation`] from the results and broadcasting it
//! to the PoS chain alongside the staking transaction to Bitcoin.

use babylon_staking_params::prelude::StakingParams;
use babylon_staking_primitives::{
    fees::check_fee_safety,
    sanitize::sanitized_bytes,
    signatures::SignatureExtractor,
    types::{SigningStep, Utxo},
};
use babylon_staking_proto::babylon::btcstaking::v1::{MsgCreateBtcDelegation, ProofOfPossessionBtc};
use babylon_staking_tx_builder::prelude::{StakingTerms, TransactionBuilder};
use babylon_staking_wallet_proto::{BtcBroadcaster, BtcSigner, ChainClient, ChainTxResponse, StdFee};
use bitcoin::{
    consensus,
    secp256k1::{schnorr, PublicKey},
    Amount, FeeRate, Script, Transaction, Txid, XOnlyPublicKey,
};
use prost::Message;
use prost_types::Any;
use tracing::{debug, error, info, warn};

use crate::{
    config::{BroadcastOrder, OrchestratorConfig},
    errors::{DelegationFailure, StakingError, StakingResult},
    gas::estimate_fee,
    pop::{pop_message, proof_of_possession},
    signing::{ensure_finalized, read_staker, sign_psbt, SignedPsbt},
    state::DelegationStage,
};

/// What the staker asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRequest {
    /// The parameter version active at submission time.
    pub params: StakingParams,

    /// The amount to stake.
    pub amount: Amount,

    /// The staking term in blocks.
    pub staking_time: u16,

    /// The finality provider to delegate to.
    pub finality_provider: XOnlyPublicKey,

    /// The coins that may fund the staking transaction.
    pub utxos: Vec<Utxo>,

    /// The fee rate of the staking transaction in sat/vB.
    pub fee_rate: u64,
}

/// The outcome of a successful delegation.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegationReceipt {
    /// The txid of the staking transaction pushed to Bitcoin.
    pub staking_txid: Txid,

    /// The response of the PoS chain.
    pub chain_response: ChainTxResponse,

    /// The message submitted to the PoS chain.
    pub message: MsgCreateBtcDelegation,
}

/// Drives a delegation from the staker's request to both chains.
///
/// Every attempt starts from scratch: the PSBTs are rebuilt and nothing is cached between
/// attempts. Nothing is retried either. A failure is returned along with the last stage reached.
#[derive(Debug, Clone)]
pub struct DelegationOrchestrator<B, S, C, P> {
    builder: B,
    signer: S,
    chain: C,
    broadcaster: P,
    config: OrchestratorConfig,
}

/// The signed transactions and signatures gathered along the way.
#[derive(Debug)]
struct SignedDelegation {
    staking: SignedPsbt,
    unbonding: SignedPsbt,
    slashing: SignedPsbt,
    slashing_sig: schnorr::Signature,
    unbonding_slashing: SignedPsbt,
    unbonding_slashing_sig: schnorr::Signature,
}

impl<B, S, C, P> DelegationOrchestrator<B, S, C, P>
where
    B: TransactionBuilder,
    S: BtcSigner,
    C: ChainClient,
    P: BtcBroadcaster,
{
    /// Creates an orchestrator over the given collaborators.
    pub const fn new(
        builder: B,
        signer: S,
        chain: C,
        broadcaster: P,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            builder,
            signer,
            chain,
            broadcaster,
            config,
        }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Runs one delegation attempt.
    pub async fn create_delegation(
        &self,
        request: DelegationRequest,
    ) -> Result<DelegationReceipt, DelegationFailure> {
        let mut stage = DelegationStage::Init;

        match self.run(&mut stage, request).await {
            Ok(receipt) => Ok(receipt),
            Err(error) => {
                error!(%stage, %error, "delegation failed");

                Err(DelegationFailure {
                    last_stage: stage,
                    error,
                })
            }
        }
    }

    async fn run(
        &self,
        stage: &mut DelegationStage,
        request: DelegationRequest,
    ) -> StakingResult<DelegationReceipt> {
        let chain_address = self.chain.account_address().await?;
        let (public_key, staker) = read_staker(&self.signer, self.config.btc.network).await?;

        info!(
            %chain_address,
            staker = %staker.address,
            amount = %request.amount,
            staking_time = request.staking_time,
            "starting delegation"
        );

        let terms = StakingTerms {
            network: self.config.btc.network,
            staker,
            finality_provider: request.finality_provider,
            params: request.params.clone(),
            staking_time: request.staking_time,
        };

        let signed = self.sign_transactions(stage, &terms, &request).await?;

        let message = self
            .sign_proof_of_possession(&chain_address, public_key)
            .await?;
        advance(stage, DelegationStage::ProofOfPossessionSigned);

        let msg = assemble_message(chain_address, &terms, request.amount, message, &signed)?;
        let any = msg
            .to_any()
            .map_err(|e| StakingError::Encoding(format!("could not pack message: {e}")))?;
        debug!(size = msg.encoded_len(), "assembled delegation message");
        advance(stage, DelegationStage::MessageAssembled);

        let simulated = self
            .chain
            .simulate(&msg.staker_addr, &[any.clone()], &self.config.gas.memo)
            .await?;
        let fee = estimate_fee(simulated, &self.config.gas)?;
        debug!(simulated, gas = fee.gas, "estimated chain fee");
        advance(stage, DelegationStage::GasEstimated);

        let staking_tx = &signed.staking.tx;
        let chain_response = match self.config.broadcast.order {
            BroadcastOrder::ChainFirst => {
                let response = self.submit(&msg.staker_addr, any, &fee).await?;
                advance(stage, DelegationStage::Broadcast);

                self.push_staking_tx(staking_tx, Some(&response.transaction_hash))
                    .await?;

                response
            }
            BroadcastOrder::BitcoinFirst => {
                self.push_staking_tx(staking_tx, None).await?;
                advance(stage, DelegationStage::Broadcast);

                self.submit(&msg.staker_addr, any, &fee).await?
            }
        };
        advance(stage, DelegationStage::Done);

        Ok(DelegationReceipt {
            staking_txid: staking_tx.compute_txid(),
            chain_response,
            message: msg,
        })
    }

    /// Builds and signs the four transactions in order, each one spending from the signed form of
    /// its predecessor.
    async fn sign_transactions(
        &self,
        stage: &mut DelegationStage,
        terms: &StakingTerms,
        request: &DelegationRequest,
    ) -> StakingResult<SignedDelegation> {
        let fee_rate = FeeRate::from_sat_per_vb(request.fee_rate)
            .ok_or(StakingError::InvalidFeeRate(request.fee_rate))?;

        let staking =
            self.builder
                .build_staking(terms, request.amount, &request.utxos, request.fee_rate)?;
        let staking_fee = staking.fee();
        advance(stage, DelegationStage::StakingBuilt);

        let staking = sign_psbt(&self.signer, SigningStep::Staking, staking).await?;
        ensure_finalized(SigningStep::Staking, &staking)?;
        check_fee_safety(
            &staking.tx,
            fee_rate,
            staking_fee,
            self.config.btc.fee_tolerance,
        )?;
        advance(stage, DelegationStage::StakingSigned);

        let unbonding = self.builder.build_unbonding(terms, &staking.tx)?;
        advance(stage, DelegationStage::UnbondingBuilt);

        let unbonding = sign_psbt(&self.signer, SigningStep::Unbonding, unbonding).await?;
        advance(stage, DelegationStage::UnbondingSigned);

        let slashing_leaf = terms.staking_scripts()?.slashing;

        let slashing = self.builder.build_staking_slashing(terms, &staking.tx)?;
        advance(stage, DelegationStage::StakingSlashingBuilt);

        let step = SigningStep::StakingOutputSlashing;
        let slashing = sign_psbt(&self.signer, step, slashing).await?;
        advance(stage, DelegationStage::StakingSlashingSigned);

        let slashing_sig = extract_signature(step, terms, &slashing_leaf, &slashing)?;
        advance(stage, DelegationStage::StakingSigExtracted);

        let unbonding_slashing_leaf = terms.unbonding_scripts()?.slashing;

        let unbonding_slashing = self
            .builder
            .build_unbonding_slashing(terms, &unbonding.tx)?;
        advance(stage, DelegationStage::UnbondingSlashingBuilt);

        let step = SigningStep::UnbondingOutputSlashing;
        let unbonding_slashing = sign_psbt(&self.signer, step, unbonding_slashing).await?;
        advance(stage, DelegationStage::UnbondingSlashingSigned);

        let unbonding_slashing_sig = extract_signature(
            step,
            terms,
            &unbonding_slashing_leaf,
            &unbonding_slashing,
        )?;
        advance(stage, DelegationStage::UnbondingSigExtracted);

        Ok(SignedDelegation {
            staking,
            unbonding,
            slashing,
            slashing_sig,
            unbonding_slashing,
            unbonding_slashing_sig,
        })
    }

    /// Asks the signer to prove possession of the staker key for `chain_address`.
    async fn sign_proof_of_possession(
        &self,
        chain_address: &str,
        public_key: PublicKey,
    ) -> StakingResult<ProofOfPossessionBtc> {
        let step = SigningStep::ProofOfPossession;
        let pop = &self.config.pop;

        let message = pop_message(chain_address, pop.message_mode)?;
        let signature = self
            .signer
            .sign_message_bip322(step, &message)
            .await
            .map_err(|e| StakingError::signing(step, e))?;

        proof_of_possession(
            public_key,
            self.config.btc.network,
            &signature,
            pop.signature_encoding,
        )
    }

    /// Submits the delegation to the PoS chain.
    async fn submit(&self, signer: &str, msg: Any, fee: &StdFee) -> StakingResult<ChainTxResponse> {
        let response = self
            .chain
            .sign_and_broadcast(signer, &[msg], fee, &self.config.gas.memo)
            .await?;

        if !response.is_ok() {
            return Err(StakingError::ChainBroadcastRejected {
                code: response.code,
                raw_log: response.raw_log.unwrap_or_default(),
            });
        }

        info!(tx_hash = %response.transaction_hash, "delegation accepted by the chain");

        Ok(response)
    }

    /// Pushes the signed staking transaction to Bitcoin.
    async fn push_staking_tx(
        &self,
        tx: &Transaction,
        chain_tx_hash: Option<&str>,
    ) -> StakingResult<()> {
        let txid = tx.compute_txid();

        let pushed = self
            .broadcaster
            .push_tx(&consensus::encode::serialize_hex(tx))
            .await
            .map_err(|reason| StakingError::BtcBroadcastFailed {
                chain_tx_hash: chain_tx_hash.map(str::to_string),
                reason,
            })?;

        if pushed != txid {
            warn!(%txid, %pushed, "broadcaster reported a different txid");
        }

        info!(%txid, "staking transaction broadcast");

        Ok(())
    }
}

/// Finds the staker's signature over `leaf` in a signed slashing transaction.
fn extract_signature(
    step: SigningStep,
    terms: &StakingTerms,
    leaf: &Script,
    signed: &SignedPsbt,
) -> StakingResult<schnorr::Signature> {
    let signature = SignatureExtractor::for_leaf(terms.staker.public_key, leaf)
        .extract(&signed.psbt, &signed.tx)
        .ok_or(StakingError::SignatureExtractionFailed { step })?;
    debug!(%step, "extracted staker signature");

    Ok(signature)
}

/// Assembles the delegation message from the sanitized transactions and extracted signatures.
fn assemble_message(
    staker_addr: String,
    terms: &StakingTerms,
    amount: Amount,
    pop: ProofOfPossessionBtc,
    signed: &SignedDelegation,
) -> StakingResult<MsgCreateBtcDelegation> {
    let unbonding_value = signed
        .unbonding
        .tx
        .output
        .first()
        .map(|output| output.value)
        .ok_or_else(|| StakingError::Encoding("unbonding transaction has no output".to_string()))?;

    Ok(MsgCreateBtcDelegation {
        staker_addr,
        pop: Some(pop),
        btc_pk: terms.staker.public_key.serialize().to_vec(),
        fp_btc_pk_list: vec![terms.finality_provider.serialize().to_vec()],
        staking_time: u32::from(terms.staking_time),
        staking_value: to_i64(amount)?,
        staking_tx: sanitized_bytes(&signed.staking.tx),
        staking_tx_inclusion_proof: None,
        slashing_tx: sanitized_bytes(&signed.slashing.tx),
        delegator_slashing_sig: signed.slashing_sig.serialize().to_vec(),
        unbonding_time: u32::from(terms.params.unbonding_time),
        unbonding_tx: sanitized_bytes(&signed.unbonding.tx),
        unbonding_value: to_i64(unbonding_value)?,
        unbonding_slashing_tx: sanitized_bytes(&signed.unbonding_slashing.tx),
        delegator_unbonding_slashing_sig: signed.unbonding_slashing_sig.serialize().to_vec(),
    })
}

fn to_i64(amount: Amount) -> StakingResult<i64> {
    i64::try_from(amount.to_sat())
        .map_err(|_| StakingError::Encoding(format!("{amount} does not fit the message")))
}

fn advance(stage: &mut DelegationStage, next: DelegationStage) {
    debug!(from = %stage, to = %next, "delegation advanced");
    *stage = next;
}

//! A Bitcoin wallet that really signs, for exercising the orchestrators end to end.

use std::sync::Arc;

use babylon_staking_primitives::{scripts::taproot::finalize_input, types::SigningStep};
use babylon_staking_wallet_proto::{
    BtcBroadcaster, BtcSigner, ProviderError, ProviderResult, WalletError, WalletResult,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use bitcoin::{
    consensus,
    hashes::{sha256, Hash},
    key::TapTweak,
    script::Instruction,
    sighash::{Prevouts, SighashCache},
    taproot::{self, LeafVersion},
    Network, Psbt, Script, TapLeafHash, TapSighashType, Transaction, TxOut, Txid, Witness,
};
use parking_lot::Mutex;
use secp256k1::{Keypair, Message, SECP256K1};
use tracing::debug;

use crate::fixtures::{staker_address, staker_keypair};

/// What the wallet does with inputs that spend through a tapscript leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptSpendMode {
    /// Leaves the signature in the PSBT unless the leaf only needs the wallet's key.
    #[default]
    Partial,

    /// Always finalizes the input with `[signature, leaf, control block]`.
    Finalized,

    /// Leaves script-path inputs untouched.
    Unsigned,
}

/// A wallet holding a single taproot key.
///
/// Key-path inputs are signed with the tweaked key and finalized. Script-path inputs are signed
/// with the untweaked key according to the [`ScriptSpendMode`]. Every request is recorded.
#[derive(Debug, Clone)]
pub struct TestWallet {
    keypair: Keypair,
    network: Network,
    script_spend_mode: ScriptSpendMode,
    reject_at: Option<SigningStep>,
    fail_broadcast: bool,
    steps: Arc<Mutex<Vec<SigningStep>>>,
    messages: Arc<Mutex<Vec<String>>>,
    broadcasts: Arc<Mutex<Vec<Transaction>>>,
}

impl TestWallet {
    /// A wallet holding the fixture staker key.
    pub fn new(network: Network) -> Self {
        Self {
            keypair: staker_keypair(),
            network,
            script_spend_mode: ScriptSpendMode::default(),
            reject_at: None,
            fail_broadcast: false,
            steps: Arc::default(),
            messages: Arc::default(),
            broadcasts: Arc::default(),
        }
    }

    /// Makes the wallet reject the request tagged with `step`.
    pub fn rejecting(mut self, step: SigningStep) -> Self {
        self.reject_at = Some(step);
        self
    }

    /// Sets how script-path inputs are signed.
    pub fn with_script_spend_mode(mut self, mode: ScriptSpendMode) -> Self {
        self.script_spend_mode = mode;
        self
    }

    /// Makes every broadcast fail.
    pub fn failing_broadcast(mut self) -> Self {
        self.fail_broadcast = true;
        self
    }

    /// The steps of every signing request received so far, in order.
    pub fn steps(&self) -> Vec<SigningStep> {
        self.steps.lock().clone()
    }

    /// The messages signed per BIP 322 so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// The transactions broadcast so far.
    pub fn broadcasts(&self) -> Vec<Transaction> {
        self.broadcasts.lock().clone()
    }

    fn record(&self, step: SigningStep) -> WalletResult<()> {
        self.steps.lock().push(step);

        if self.reject_at == Some(step) {
            debug!(%step, "rejecting signing request");
            return Err(WalletError::Rejected("user rejected the request".to_string()));
        }

        Ok(())
    }

    fn sign(&self, psbt: &mut Psbt) -> WalletResult<()> {
        let prevouts = psbt
            .inputs
            .iter()
            .map(|input| input.witness_utxo.clone())
            .collect::<Option<Vec<TxOut>>>()
            .ok_or_else(|| WalletError::Malformed("missing witness utxo".to_string()))?;
        let prevouts = Prevouts::All(prevouts.as_slice());

        let unsigned_tx = psbt.unsigned_tx.clone();
        let mut sighasher = SighashCache::new(&unsigned_tx);
        let (x_only, _) = self.keypair.x_only_public_key();

        for (index, input) in psbt.inputs.iter_mut().enumerate() {
            if let Some((control_block, (script, _))) = input.tap_scripts.first_key_value() {
                if self.script_spend_mode == ScriptSpendMode::Unsigned {
                    continue;
                }

                let leaf_hash = TapLeafHash::from_script(script, LeafVersion::TapScript);
                let sighash = sighasher
                    .taproot_script_spend_signature_hash(
                        index,
                        &prevouts,
                        leaf_hash,
                        TapSighashType::Default,
                    )
                    .map_err(|e| WalletError::Malformed(e.to_string()))?;

                let signature = taproot::Signature {
                    signature: SECP256K1.sign_schnorr(
                        &Message::from_digest(sighash.to_byte_array()),
                        &self.keypair,
                    ),
                    sighash_type: TapSighashType::Default,
                };

                let finalize = self.script_spend_mode == ScriptSpendMode::Finalized
                    || only_needs_key(script, &x_only.serialize());

                if finalize {
                    let witness = [
                        signature.to_vec(),
                        script.to_bytes(),
                        control_block.serialize(),
                    ];
                    finalize_input(input, witness);
                } else {
                    input.tap_script_sigs.insert((x_only, leaf_hash), signature);
                }
            } else if input.tap_internal_key == Some(x_only) {
                let sighash = sighasher
                    .taproot_key_spend_signature_hash(index, &prevouts, TapSighashType::Default)
                    .map_err(|e| WalletError::Malformed(e.to_string()))?;

                let tweaked = self.keypair.tap_tweak(SECP256K1, input.tap_merkle_root);
                let signature = SECP256K1.sign_schnorr(
                    &Message::from_digest(sighash.to_byte_array()),
                    &tweaked.to_inner(),
                );

                finalize_input(input, [signature.serialize()]);
            } else {
                return Err(WalletError::Malformed(format!(
                    "input {index} is not spendable by this wallet"
                )));
            }
        }

        Ok(())
    }
}

/// Whether the only key pushed by `script` is `key`.
fn only_needs_key(script: &Script, key: &[u8; 32]) -> bool {
    let mut keys = script.instructions().filter_map(|instruction| match instruction {
        Ok(Instruction::PushBytes(bytes)) if bytes.len() == 32 => Some(bytes.as_bytes().to_vec()),
        _ => None,
    });

    keys.next().is_some_and(|first| first == key) && keys.next().is_none()
}

impl BtcSigner for TestWallet {
    async fn public_key_hex(&self) -> WalletResult<String> {
        Ok(hex::encode(self.keypair.public_key().serialize()))
    }

    async fn address(&self) -> WalletResult<String> {
        Ok(staker_address(self.network).to_string())
    }

    async fn sign_psbt(&self, step: SigningStep, psbt_hex: &str) -> WalletResult<String> {
        self.record(step)?;

        let bytes = hex::decode(psbt_hex).map_err(|e| WalletError::Malformed(e.to_string()))?;
        let mut psbt =
            Psbt::deserialize(&bytes).map_err(|e| WalletError::Malformed(e.to_string()))?;

        self.sign(&mut psbt)?;

        Ok(psbt.serialize_hex())
    }

    async fn sign_message_bip322(&self, step: SigningStep, message: &str) -> WalletResult<String> {
        self.record(step)?;
        self.messages.lock().push(message.to_string());

        let digest = sha256::Hash::hash(message.as_bytes());
        let signature = SECP256K1.sign_schnorr(
            &Message::from_digest(digest.to_byte_array()),
            &self.keypair,
        );

        let witness = Witness::from_slice(&[signature.serialize()]);

        Ok(STANDARD.encode(consensus::serialize(&witness)))
    }
}

impl BtcBroadcaster for TestWallet {
    async fn push_tx(&self, tx_hex: &str) -> ProviderResult<Txid> {
        if self.fail_broadcast {
            return Err(ProviderError::Rejected("bad-txns-inputs-missingorspent".to_string()));
        }

        let tx: Transaction = consensus::encode::deserialize_hex(tx_hex)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let txid = tx.compute_txid();

        self.broadcasts.lock().push(tx);

        Ok(txid)
    }
}

//! Provides some common, standalone utilities and wrappers over [`bitcoin`] to create taproot
//! addresses and to spend them.

use std::collections::BTreeMap;

use bitcoin::{
    key::UntweakedPublicKey,
    psbt::Input,
    taproot::{ControlBlock, LeafVersion, TaprootBuilder, TaprootSpendInfo},
    Address, Network, ScriptBuf, Witness,
};
use secp256k1::SECP256K1;

use crate::{
    constants::UNSPENDABLE_INTERNAL_KEY,
    errors::{ScriptError, ScriptResult},
};

/// Different spending paths for a taproot.
///
/// It can be a key path spend, a script path spend or both.
#[derive(Debug, Clone)]
pub enum SpendPath<'path> {
    /// Key path spend that requires just an untweaked (internal) public key.
    KeySpend {
        /// The internal key used to construct the taproot.
        internal_key: UntweakedPublicKey,
    },

    /// Script path spend that only allows spending via scripts in the taproot tree, with the
    /// internal key being the [`static@UNSPENDABLE_INTERNAL_KEY`].
    ScriptSpend {
        /// The scripts that live in the leaves of the taproot tree.
        scripts: &'path [ScriptBuf],
    },
}

/// Create a taproot address for the given `spend_path`.
///
/// # Errors
///
/// If the scripts is empty in [`SpendPath::ScriptSpend`].
pub fn create_taproot_addr(
    network: Network,
    spend_path: SpendPath<'_>,
) -> ScriptResult<(Address, TaprootSpendInfo)> {
    match spend_path {
        SpendPath::KeySpend { internal_key } => build_taptree(internal_key, network, &[]),
        SpendPath::ScriptSpend { scripts } => {
            if scripts.is_empty() {
                return Err(ScriptError::EmptyTapscript);
            }

            build_taptree(*UNSPENDABLE_INTERNAL_KEY, network, scripts)
        }
    }
}

/// Constructs the taptree for the given scripts.
///
/// Scripts fill the deepest level of the smallest tree that fits all of them, left to right, and
/// the remainder sits one level up. With three scripts the first two are siblings at depth 2 and
/// the third is at depth 1.
fn build_taptree(
    internal_key: UntweakedPublicKey,
    network: Network,
    scripts: &[ScriptBuf],
) -> ScriptResult<(Address, TaprootSpendInfo)> {
    let mut taproot_builder = TaprootBuilder::new();

    let num_scripts = scripts.len();

    let max_depth = if num_scripts > 1 {
        (num_scripts - 1).ilog2() + 1
    } else {
        0
    };

    let max_num_scripts = 2usize.pow(max_depth);

    let num_penultimate_scripts = max_num_scripts.saturating_sub(num_scripts);
    let num_deepest_scripts = num_scripts.saturating_sub(num_penultimate_scripts);

    for (script_idx, script) in scripts.iter().enumerate() {
        let depth = if script_idx < num_deepest_scripts {
            max_depth as u8
        } else {
            (max_depth - 1) as u8
        };

        taproot_builder = taproot_builder.add_leaf(depth, script.clone())?;
    }

    let spend_info = taproot_builder
        .finalize(SECP256K1, internal_key)
        .map_err(|_| ScriptError::TaprootFinalize)?;

    let merkle_root = spend_info.merkle_root();

    Ok((
        Address::p2tr(SECP256K1, internal_key, merkle_root, network),
        spend_info,
    ))
}

/// Returns the control block required to spend `script` out of the tree in `spend_info`.
pub fn control_block_for(
    spend_info: &TaprootSpendInfo,
    script: &ScriptBuf,
) -> ScriptResult<ControlBlock> {
    spend_info
        .control_block(&(script.clone(), LeafVersion::TapScript))
        .ok_or(ScriptError::MissingLeaf)
}

/// Finalizes a [`bitcoin::Psbt`] input.
///
/// This done as per
/// <https://github.com/rust-bitcoin/rust-bitcoin/blob/bitcoin-0.32.1/bitcoin/examples/taproot-psbt.rs#L315-L327>.
pub fn finalize_input<D>(input: &mut Input, witnesses: impl IntoIterator<Item = D>)
where
    D: AsRef<[u8]>,
{
    let mut witness_stack = Witness::new();

    witnesses
        .into_iter()
        .for_each(|witness| witness_stack.push(witness));

    input.final_script_witness = Some(witness_stack);

    // clear all other fields as per BIP 174
    input.partial_sigs = BTreeMap::new();
    input.sighash_type = None;
    input.redeem_script = None;
    input.witness_script = None;
    input.bip32_derivation = BTreeMap::new();
    input.tap_key_sig = None;
    input.tap_script_sigs = BTreeMap::new();
    input.tap_scripts = BTreeMap::new();
    input.tap_key_origins = BTreeMap::new();
    input.tap_internal_key = None;
    input.tap_merkle_root = None;
}

#[cfg(test)]
mod tests {
    use bitcoin::{opcodes::OP_TRUE, script::Builder};

    use super::*;

    fn scripts(n: u8) -> Vec<ScriptBuf> {
        (0..n)
            .map(|i| {
                Builder::new()
                    .push_int(i as i64)
                    .push_opcode(OP_TRUE)
                    .into_script()
            })
            .collect()
    }

    #[test]
    fn test_create_taproot_addr() {
        for n in 1..=5 {
            let scripts = scripts(n);
            let (address, spend_info) =
                create_taproot_addr(Network::Regtest, SpendPath::ScriptSpend { scripts: &scripts })
                    .expect("must be able to build the tree");

            assert!(address.script_pubkey().is_p2tr());
            assert_eq!(spend_info.internal_key(), *UNSPENDABLE_INTERNAL_KEY);

            for script in &scripts {
                assert!(
                    control_block_for(&spend_info, script).is_ok(),
                    "every script must be spendable"
                );
            }
        }

        assert!(matches!(
            create_taproot_addr(Network::Regtest, SpendPath::ScriptSpend { scripts: &[] }),
            Err(ScriptError::EmptyTapscript)
        ));
    }

    #[test]
    fn test_three_leaf_depths() {
        let scripts = scripts(3);
        let (_, spend_info) =
            create_taproot_addr(Network::Regtest, SpendPath::ScriptSpend { scripts: &scripts })
                .unwrap();

        let depth = |script: &ScriptBuf| {
            control_block_for(&spend_info, script)
                .unwrap()
                .merkle_branch
                .len()
        };

        assert_eq!(depth(&scripts[0]), 2);
        assert_eq!(depth(&scripts[1]), 2);
        assert_eq!(depth(&scripts[2]), 1);
    }

    #[test]
    fn test_missing_leaf() {
        let scripts = scripts(2);
        let (_, spend_info) =
            create_taproot_addr(Network::Regtest, SpendPath::ScriptSpend { scripts: &scripts[..1] })
                .unwrap();

        assert!(matches!(
            control_block_for(&spend_info, &scripts[1]),
            Err(ScriptError::MissingLeaf)
        ));
    }
}

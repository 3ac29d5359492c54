//! The scripts that lock a Babylon stake.
//!
//! A staking output commits to three leaves:
//!
//! - timelock: `<staker> OP_CHECKSIGVERIFY <t> OP_CSV`
//! - unbonding: `<staker> OP_CHECKSIGVERIFY <covenant multisig>`
//! - slashing: `<staker> OP_CHECKSIGVERIFY <fp> OP_CHECKSIGVERIFY <covenant multisig>`
//!
//! The unbonding output only keeps the timelock (with the unbonding time) and slashing leaves.

use bitcoin::{
    opcodes::all::{
        OP_CHECKSIG, OP_CHECKSIGADD, OP_CHECKSIGVERIFY, OP_CSV, OP_NUMEQUAL, OP_NUMEQUALVERIFY,
    },
    script::Builder,
    taproot::TaprootSpendInfo,
    Address, Network, ScriptBuf, XOnlyPublicKey,
};

use super::taproot::{create_taproot_addr, SpendPath};
use crate::errors::{ScriptError, ScriptResult};

/// Builds `<pk> OP_CHECKSIGVERIFY <lock_time> OP_CSV`.
pub fn timelock_script(pk: &XOnlyPublicKey, lock_time: u16) -> ScriptBuf {
    Builder::new()
        .push_x_only_key(pk)
        .push_opcode(OP_CHECKSIGVERIFY)
        .push_int(i64::from(lock_time))
        .push_opcode(OP_CSV)
        .into_script()
}

/// Builds `<pk> OP_CHECKSIG`, or `<pk> OP_CHECKSIGVERIFY` if `with_verify` is set.
pub fn single_key_script(pk: &XOnlyPublicKey, with_verify: bool) -> ScriptBuf {
    let opcode = if with_verify {
        OP_CHECKSIGVERIFY
    } else {
        OP_CHECKSIG
    };

    Builder::new()
        .push_x_only_key(pk)
        .push_opcode(opcode)
        .into_script()
}

/// Builds a `quorum`-of-`keys` script out of `OP_CHECKSIGADD`s.
///
/// The keys are sorted lexicographically so that the script does not depend on the order in which
/// they were supplied. A single key degrades to [`single_key_script`].
pub fn multisig_script(
    keys: &[XOnlyPublicKey],
    quorum: usize,
    with_verify: bool,
) -> ScriptResult<ScriptBuf> {
    if keys.is_empty() {
        return Err(ScriptError::NoKeys);
    }

    if quorum == 0 || quorum > keys.len() {
        return Err(ScriptError::InvalidQuorum {
            quorum,
            keys: keys.len(),
        });
    }

    if let [key] = keys {
        return Ok(single_key_script(key, with_verify));
    }

    let mut sorted = keys.to_vec();
    sorted.sort_by_key(|key| key.serialize());

    if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(ScriptError::DuplicateKeys);
    }

    let mut builder = Builder::new();
    for (i, key) in sorted.iter().enumerate() {
        let opcode = if i == 0 { OP_CHECKSIG } else { OP_CHECKSIGADD };
        builder = builder.push_x_only_key(key).push_opcode(opcode);
    }

    let opcode = if with_verify {
        OP_NUMEQUALVERIFY
    } else {
        OP_NUMEQUAL
    };

    Ok(builder
        .push_int(quorum as i64)
        .push_opcode(opcode)
        .into_script())
}

fn concat(scripts: &[&ScriptBuf]) -> ScriptBuf {
    let bytes = scripts
        .iter()
        .flat_map(|script| script.as_bytes().iter().copied())
        .collect::<Vec<u8>>();

    ScriptBuf::from_bytes(bytes)
}

/// All spending paths of a Babylon staking (or unbonding) output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingScripts {
    /// Lets the staker spend after the relative timelock.
    pub timelock: ScriptBuf,

    /// Lets the staker exit early with the covenant committee's approval.
    pub unbonding: ScriptBuf,

    /// Lets the covenant committee slash the stake with the finality provider's key.
    pub slashing: ScriptBuf,
}

impl StakingScripts {
    /// Assembles the scripts for the given participants.
    pub fn new(
        staker: &XOnlyPublicKey,
        finality_providers: &[XOnlyPublicKey],
        covenant_keys: &[XOnlyPublicKey],
        covenant_quorum: usize,
        lock_time: u16,
    ) -> ScriptResult<Self> {
        let staker_sig = single_key_script(staker, true);
        let covenant_multisig = multisig_script(covenant_keys, covenant_quorum, false)?;
        let fp_sig = multisig_script(finality_providers, 1, true)?;

        Ok(Self {
            timelock: timelock_script(staker, lock_time),
            unbonding: concat(&[&staker_sig, &covenant_multisig]),
            slashing: concat(&[&staker_sig, &fp_sig, &covenant_multisig]),
        })
    }

    /// The taproot output that locks the stake itself.
    pub fn staking_output(&self, network: Network) -> ScriptResult<(Address, TaprootSpendInfo)> {
        let scripts = [
            self.timelock.clone(),
            self.unbonding.clone(),
            self.slashing.clone(),
        ];

        create_taproot_addr(network, SpendPath::ScriptSpend { scripts: &scripts })
    }

    /// The taproot output of the unbonding transaction.
    ///
    /// `self` must have been built with the unbonding time as its lock time.
    pub fn unbonding_output(&self, network: Network) -> ScriptResult<(Address, TaprootSpendInfo)> {
        let scripts = [self.timelock.clone(), self.slashing.clone()];

        create_taproot_addr(network, SpendPath::ScriptSpend { scripts: &scripts })
    }
}

/// The change output of a slashing transaction, spendable by `staker` after `lock_time`.
pub fn slashing_change_output(
    staker: &XOnlyPublicKey,
    lock_time: u16,
    network: Network,
) -> ScriptResult<(Address, TaprootSpendInfo)> {
    let scripts = [timelock_script(staker, lock_time)];

    create_taproot_addr(network, SpendPath::ScriptSpend { scripts: &scripts })
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        script::Instruction,
        secp256k1::{Keypair, SECP256K1},
    };

    use super::*;
    use crate::scripts::taproot::control_block_for;

    fn keys(n: u8) -> Vec<XOnlyPublicKey> {
        (1..=n)
            .map(|i| {
                Keypair::from_seckey_slice(SECP256K1, &[i; 32])
                    .unwrap()
                    .x_only_public_key()
                    .0
            })
            .collect()
    }

    #[test]
    fn test_timelock_script() {
        let staker = keys(1)[0];
        let script = timelock_script(&staker, 150);

        let instructions = script.instructions().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(instructions.len(), 4);
        assert!(matches!(
            instructions[0],
            Instruction::PushBytes(bytes) if bytes.as_bytes() == staker.serialize()
        ));
        assert_eq!(instructions[1], Instruction::Op(OP_CHECKSIGVERIFY));
        assert_eq!(instructions[3], Instruction::Op(OP_CSV));
    }

    #[test]
    fn test_multisig_is_order_independent() {
        let mut keys = keys(5);
        let script = multisig_script(&keys, 3, false).unwrap();

        keys.reverse();
        assert_eq!(multisig_script(&keys, 3, false).unwrap(), script);

        let checksigadds = script
            .instructions()
            .filter(|i| matches!(i, Ok(Instruction::Op(op)) if *op == OP_CHECKSIGADD))
            .count();
        assert_eq!(checksigadds, 4);
    }

    #[test]
    fn test_multisig_rejects_bad_input() {
        let mut keys = keys(3);

        assert!(matches!(
            multisig_script(&[], 1, false),
            Err(ScriptError::NoKeys)
        ));
        assert!(matches!(
            multisig_script(&keys, 4, false),
            Err(ScriptError::InvalidQuorum { quorum: 4, keys: 3 })
        ));

        keys[2] = keys[0];
        assert!(matches!(
            multisig_script(&keys, 2, false),
            Err(ScriptError::DuplicateKeys)
        ));
    }

    #[test]
    fn test_single_covenant_key() {
        let keys = keys(1);

        assert_eq!(
            multisig_script(&keys, 1, false).unwrap(),
            single_key_script(&keys[0], false)
        );
    }

    #[test]
    fn test_staking_scripts() {
        let keys = keys(7);
        let (staker, fp, covenants) = (keys[0], keys[1], &keys[2..]);

        let scripts = StakingScripts::new(&staker, &[fp], covenants, 3, 100).unwrap();

        assert!(scripts.unbonding.as_bytes().starts_with(&[0x20]));
        assert!(scripts.slashing.len() > scripts.unbonding.len());
        assert!(scripts
            .slashing
            .as_bytes()
            .ends_with(&multisig_script(covenants, 3, false).unwrap().to_bytes()));

        let (address, spend_info) = scripts.staking_output(Network::Regtest).unwrap();
        assert!(address.script_pubkey().is_p2tr());
        for leaf in [&scripts.timelock, &scripts.unbonding, &scripts.slashing] {
            assert!(control_block_for(&spend_info, leaf).is_ok());
        }

        let (_, spend_info) = scripts.unbonding_output(Network::Regtest).unwrap();
        assert!(control_block_for(&spend_info, &scripts.unbonding).is_err());
        assert!(control_block_for(&spend_info, &scripts.slashing).is_ok());
    }
}

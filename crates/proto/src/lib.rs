//! Protobuf messages of the Babylon BTC staking module.
#![allow(missing_docs)]

pub mod babylon {
    pub mod btccheckpoint {
        // @@protoc_insertion_point(attribute:babylon.btccheckpoint.v1)
        pub mod v1 {
            include!("gen/babylon.btccheckpoint.v1.rs");
            // @@protoc_insertion_point(babylon.btccheckpoint.v1)
        }
    }
    pub mod btcstaking {
        // @@protoc_insertion_point(attribute:babylon.btcstaking.v1)
        pub mod v1 {
            include!("gen/babylon.btcstaking.v1.rs");
            // @@protoc_insertion_point(babylon.btcstaking.v1)
            include!("impl/babylon.btcstaking.v1.impl.rs");
        }
    }
}

#[cfg(test)]
mod test {
    use prost::{Message, Name};

    use crate::babylon::{
        btccheckpoint::v1::TransactionKey,
        btcstaking::v1::{
            Bip322Sig, BtcSigType, InclusionProof, MsgCreateBtcDelegation, ProofOfPossessionBtc,
            MSG_CREATE_BTC_DELEGATION_TYPE_URL,
        },
    };

    fn msg() -> MsgCreateBtcDelegation {
        MsgCreateBtcDelegation {
            staker_addr: "bbn1qyqszqgpqyqszqgpqyqszqgpqyqszqgp7j9m9v".to_string(),
            pop: Some(ProofOfPossessionBtc::bip322("bcrt1qaddress", vec![1, 2, 3])),
            btc_pk: vec![2; 32],
            fp_btc_pk_list: vec![vec![3; 32]],
            staking_time: 100,
            staking_value: 10_000,
            staking_tx: vec![4; 10],
            staking_tx_inclusion_proof: None,
            slashing_tx: vec![5; 10],
            delegator_slashing_sig: vec![6; 64],
            unbonding_time: 20,
            unbonding_tx: vec![7; 10],
            unbonding_value: 9_500,
            unbonding_slashing_tx: vec![8; 10],
            delegator_unbonding_slashing_sig: vec![9; 64],
        }
    }

    #[test]
    fn test_type_url() {
        assert_eq!(
            MsgCreateBtcDelegation::type_url(),
            MSG_CREATE_BTC_DELEGATION_TYPE_URL
        );

        let any = msg().to_any().unwrap();
        assert_eq!(any.type_url, MSG_CREATE_BTC_DELEGATION_TYPE_URL);
        assert_eq!(MsgCreateBtcDelegation::decode(&any.value[..]).unwrap(), msg());
    }

    #[test]
    fn test_field_tags() {
        let staking_time_only = MsgCreateBtcDelegation {
            staking_time: 100,
            ..Default::default()
        };
        // field 5, varint
        assert_eq!(staking_time_only.encode_to_vec(), vec![0x28, 100]);

        let unbonding_value_only = MsgCreateBtcDelegation {
            unbonding_value: 1,
            ..Default::default()
        };
        // field 13, varint
        assert_eq!(unbonding_value_only.encode_to_vec(), vec![0x68, 1]);

        let sig_only = MsgCreateBtcDelegation {
            delegator_unbonding_slashing_sig: vec![0xaa],
            ..Default::default()
        };
        // field 15, length delimited
        assert_eq!(sig_only.encode_to_vec(), vec![0x7a, 1, 0xaa]);
    }

    #[test]
    fn test_bip322_pop() {
        let pop = ProofOfPossessionBtc::bip322("bcrt1qaddress", vec![0xde, 0xad]);
        assert_eq!(pop.btc_sig_type, BtcSigType::Bip322 as i32);

        let sig = Bip322Sig::decode(&pop.btc_sig[..]).unwrap();
        assert_eq!(sig.address, "bcrt1qaddress");
        assert_eq!(sig.sig, vec![0xde, 0xad]);
    }

    #[test]
    fn test_inclusion_proof_round_trip() {
        let mut msg = msg();
        msg.staking_tx_inclusion_proof = Some(InclusionProof {
            key: Some(TransactionKey {
                index: 3,
                hash: vec![1; 32],
            }),
            proof: vec![2; 64],
        });

        let decoded = MsgCreateBtcDelegation::decode(&msg.encode_to_vec()[..]).unwrap();
        assert_eq!(decoded, msg);
    }
}

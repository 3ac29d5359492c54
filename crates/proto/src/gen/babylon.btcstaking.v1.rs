// @generated
/// ProofOfPossessionBTC is the proof of possession that a Babylon address and
/// a Bitcoin secp256k1 secret key are held by the same person
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProofOfPossessionBtc {
    /// btc_sig_type indicates the type of btc_sig in the pop
    #[prost(enumeration = "BtcSigType", tag = "1")]
    pub btc_sig_type: i32,
    /// btc_sig is the signature generated via sign(sk_btc, babylon_staker_address)
    /// the signature follows encoding in either BIP-340 spec or BIP-322 spec
    #[prost(bytes = "vec", tag = "2")]
    pub btc_sig: ::prost::alloc::vec::Vec<u8>,
}
impl ::prost::Name for ProofOfPossessionBtc {
    const NAME: &'static str = "ProofOfPossessionBTC";
    const PACKAGE: &'static str = "babylon.btcstaking.v1";
    fn full_name() -> ::prost::alloc::string::String {
        "babylon.btcstaking.v1.ProofOfPossessionBTC".into()
    }
    fn type_url() -> ::prost::alloc::string::String {
        "/babylon.btcstaking.v1.ProofOfPossessionBTC".into()
    }
}
/// BIP322Sig is a BIP-322 signature together with the address corresponding to
/// the signer
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Bip322Sig {
    /// address is the signer's address
    #[prost(string, tag = "1")]
    pub address: ::prost::alloc::string::String,
    /// sig is the actual signature in BIP-322 format
    #[prost(bytes = "vec", tag = "2")]
    pub sig: ::prost::alloc::vec::Vec<u8>,
}
impl ::prost::Name for Bip322Sig {
    const NAME: &'static str = "BIP322Sig";
    const PACKAGE: &'static str = "babylon.btcstaking.v1";
    fn full_name() -> ::prost::alloc::string::String {
        "babylon.btcstaking.v1.BIP322Sig".into()
    }
    fn type_url() -> ::prost::alloc::string::String {
        "/babylon.btcstaking.v1.BIP322Sig".into()
    }
}
/// BTCSigType indicates the type of btc_sig in a pop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum BtcSigType {
    /// BIP340 means the btc_sig will follow the BIP-340 encoding
    Bip340 = 0,
    /// BIP322 means the btc_sig will follow the BIP-322 encoding
    Bip322 = 1,
    /// ECDSA means the btc_sig will follow the ECDSA encoding
    Ecdsa = 2,
}
impl BtcSigType {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            BtcSigType::Bip340 => "BIP340",
            BtcSigType::Bip322 => "BIP322",
            BtcSigType::Ecdsa => "ECDSA",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "BIP340" => Some(Self::Bip340),
            "BIP322" => Some(Self::Bip322),
            "ECDSA" => Some(Self::Ecdsa),
            _ => None,
        }
    }
}
/// InclusionProof proves the existence of a tx on BTC blockchain
/// including
/// - the position of the tx on BTC blockchain
/// - the Merkle proof that this tx is on the above position
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InclusionProof {
    /// key is the position (txIdx, blockHash) of this tx on BTC blockchain
    #[prost(message, optional, tag = "1")]
    pub key: ::core::option::Option<super::super::btccheckpoint::v1::TransactionKey>,
    /// proof is the Merkle proof that this tx is included in the position in `key`
    #[prost(bytes = "vec", tag = "2")]
    pub proof: ::prost::alloc::vec::Vec<u8>,
}
impl ::prost::Name for InclusionProof {
    const NAME: &'static str = "InclusionProof";
    const PACKAGE: &'static str = "babylon.btcstaking.v1";
    fn full_name() -> ::prost::alloc::string::String {
        "babylon.btcstaking.v1.InclusionProof".into()
    }
    fn type_url() -> ::prost::alloc::string::String {
        "/babylon.btcstaking.v1.InclusionProof".into()
    }
}
/// MsgCreateBTCDelegation is the message for creating a BTC delegation
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreateBtcDelegation {
    /// staker_addr is the address to receive rewards from BTC delegation.
    #[prost(string, tag = "1")]
    pub staker_addr: ::prost::alloc::string::String,
    /// pop is the proof of possession of btc_pk by the staker_addr.
    #[prost(message, optional, tag = "2")]
    pub pop: ::core::option::Option<ProofOfPossessionBtc>,
    /// btc_pk is the Bitcoin secp256k1 PK of the BTC delegator
    #[prost(bytes = "vec", tag = "3")]
    pub btc_pk: ::prost::alloc::vec::Vec<u8>,
    /// fp_btc_pk_list is the list of Bitcoin secp256k1 PKs of the finality providers, if there is more than one
    /// finality provider pk it means that delegation is re-staked
    #[prost(bytes = "vec", repeated, tag = "4")]
    pub fp_btc_pk_list: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    /// staking_time is the time lock used in staking transaction
    #[prost(uint32, tag = "5")]
    pub staking_time: u32,
    /// staking_value  is the amount of satoshis locked in staking output
    #[prost(int64, tag = "6")]
    pub staking_value: i64,
    /// staking_tx is a bitcoin staking transaction i.e transaction that locks funds
    #[prost(bytes = "vec", tag = "7")]
    pub staking_tx: ::prost::alloc::vec::Vec<u8>,
    /// staking_tx_inclusion_proof is the inclusion proof of the staking tx in BTC chain
    #[prost(message, optional, tag = "8")]
    pub staking_tx_inclusion_proof: ::core::option::Option<InclusionProof>,
    /// slashing_tx is the slashing tx
    /// Note that the tx itself does not contain signatures, which are off-chain.
    #[prost(bytes = "vec", tag = "9")]
    pub slashing_tx: ::prost::alloc::vec::Vec<u8>,
    /// delegator_slashing_sig is the signature on the slashing tx by the delegator (i.e., SK corresponding to btc_pk).
    /// It will be a part of the witness for the staking tx output.
    /// The staking tx output further needs signatures from covenant and finality provider in
    /// order to be spendable.
    #[prost(bytes = "vec", tag = "10")]
    pub delegator_slashing_sig: ::prost::alloc::vec::Vec<u8>,
    /// unbonding_time is the time lock used when funds are being unbonded. It is be used in:
    /// - unbonding transaction, time lock spending path
    /// - staking slashing transaction, change output
    /// - unbonding slashing transaction, change output
    /// It must be smaller than math.MaxUInt16 and larger that max(MinUnbondingTime, CheckpointFinalizationTimeout)
    #[prost(uint32, tag = "11")]
    pub unbonding_time: u32,
    /// fields related to unbonding transaction
    /// unbonding_tx is a bitcoin unbonding transaction i.e transaction that spends
    /// staking output and sends it to the unbonding output
    #[prost(bytes = "vec", tag = "12")]
    pub unbonding_tx: ::prost::alloc::vec::Vec<u8>,
    /// unbonding value is amount of satoshis locked in unbonding output.
    /// NOTE: staking_value and unbonding_value could be different because of the difference between the fee for staking tx and that for unbonding
    #[prost(int64, tag = "13")]
    pub unbonding_value: i64,
    /// unbonding_slashing_tx is the slashing tx which slash unbonding contract
    /// Note that the tx itself does not contain signatures, which are off-chain.
    #[prost(bytes = "vec", tag = "14")]
    pub unbonding_slashing_tx: ::prost::alloc::vec::Vec<u8>,
    /// delegator_unbonding_slashing_sig is the signature on the slashing tx by the delegator (i.e., SK corresponding to btc_pk).
    #[prost(bytes = "vec", tag = "15")]
    pub delegator_unbonding_slashing_sig: ::prost::alloc::vec::Vec<u8>,
}
impl ::prost::Name for MsgCreateBtcDelegation {
    const NAME: &'static str = "MsgCreateBTCDelegation";
    const PACKAGE: &'static str = "babylon.btcstaking.v1";
    fn full_name() -> ::prost::alloc::string::String {
        "babylon.btcstaking.v1.MsgCreateBTCDelegation".into()
    }
    fn type_url() -> ::prost::alloc::string::String {
        "/babylon.btcstaking.v1.MsgCreateBTCDelegation".into()
    }
}
/// MsgCreateBTCDelegationResponse is the response for MsgCreateBTCDelegation
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreateBtcDelegationResponse {}
impl ::prost::Name for MsgCreateBtcDelegationResponse {
    const NAME: &'static str = "MsgCreateBTCDelegationResponse";
    const PACKAGE: &'static str = "babylon.btcstaking.v1";
    fn full_name() -> ::prost::alloc::string::String {
        "babylon.btcstaking.v1.MsgCreateBTCDelegationResponse".into()
    }
    fn type_url() -> ::prost::alloc::string::String {
        "/babylon.btcstaking.v1.MsgCreateBTCDelegationResponse".into()
    }
}
// @@protoc_insertion_point(module)

use prost::Message;

/// Type URL under which [`MsgCreateBtcDelegation`] is submitted.
pub const MSG_CREATE_BTC_DELEGATION_TYPE_URL: &str = "/babylon.btcstaking.v1.MsgCreateBTCDelegation";

impl ProofOfPossessionBtc {
    /// Wraps a BIP-322 signature produced by the owner of `address`.
    pub fn bip322(address: impl Into<String>, sig: Vec<u8>) -> Self {
        let btc_sig = Bip322Sig {
            address: address.into(),
            sig,
        }
        .encode_to_vec();

        Self {
            btc_sig_type: BtcSigType::Bip322 as i32,
            btc_sig,
        }
    }
}

impl MsgCreateBtcDelegation {
    /// Packs the message into a `google.protobuf.Any` ready to be included in a chain
    /// transaction.
    pub fn to_any(&self) -> Result<prost_types::Any, prost::EncodeError> {
        prost_types::Any::from_msg(self)
    }
}

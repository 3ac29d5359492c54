// @generated
/// Each provided OP_RETURN transaction can be identified by hash of block in
/// which transaction was included and transaction index in the block
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionKey {
    #[prost(uint32, tag = "1")]
    pub index: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
}
impl ::prost::Name for TransactionKey {
    const NAME: &'static str = "TransactionKey";
    const PACKAGE: &'static str = "babylon.btccheckpoint.v1";
    fn full_name() -> ::prost::alloc::string::String {
        "babylon.btccheckpoint.v1.TransactionKey".into()
    }
    fn type_url() -> ::prost::alloc::string::String {
        "/babylon.btccheckpoint.v1.TransactionKey".into()
    }
}
// @@protoc_insertion_point(module)

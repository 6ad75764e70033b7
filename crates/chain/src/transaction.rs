//! Transaction assembly and signing.
//!
//! A transaction binds its operations to a recent block (TAPOS), expires
//! shortly after the head block time it was built from, and is signed over
//! `sha256(chain_id ++ wire_bytes)` rather than over its JSON form.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::key::{PrivateKey, SignError};
use crate::operation::Operation;
use crate::rpc::DynamicGlobalProperties;
use crate::serializer::{write_varint, WireEncode};

/// The mainnet chain id: 32 zero bytes.
pub const STEEM_CHAIN_ID: [u8; 32] = [0; 32];

/// How far past the head block time a transaction stays valid.
pub const TX_EXPIRATION_SECS: i64 = 60;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TxError {
    #[error("malformed head block id `{0}`")]
    InvalidBlockId(String),
    #[error("malformed head block time `{0}`")]
    InvalidTimestamp(String),
}

/// The authority tier a signer commits to a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    Posting,
    Active,
    Owner,
}

impl Authority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Posting => "posting",
            Self::Active => "active",
            Self::Owner => "owner",
        }
    }
}

/// A fully signed transaction in condenser JSON form, ready to broadcast.
#[derive(Clone, Debug, Serialize)]
pub struct SignedTransaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub expiration: String,
    pub operations: Vec<Operation>,
    pub extensions: Vec<serde_json::Value>,
    pub signatures: Vec<String>,
}

/// Assembles one transaction: operations first, then signers, then `sign`.
#[derive(Debug)]
pub struct TransactionBuilder {
    ref_block_num: u16,
    ref_block_prefix: u32,
    expiration: NaiveDateTime,
    operations: Vec<Operation>,
    signers: Vec<(String, Authority)>,
}

impl TransactionBuilder {
    /// Derives the TAPOS reference fields and expiration from the node's
    /// dynamic global properties.
    pub fn new(props: &DynamicGlobalProperties) -> Result<Self, TxError> {
        let raw = hex::decode(&props.head_block_id)
            .map_err(|_| TxError::InvalidBlockId(props.head_block_id.clone()))?;
        let prefix: [u8; 4] = raw
            .get(4..8)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| TxError::InvalidBlockId(props.head_block_id.clone()))?;

        let head_time = NaiveDateTime::parse_from_str(&props.time, TIME_FORMAT)
            .map_err(|_| TxError::InvalidTimestamp(props.time.clone()))?;

        Ok(Self {
            ref_block_num: (props.head_block_number & 0xffff) as u16,
            ref_block_prefix: u32::from_le_bytes(prefix),
            expiration: head_time + Duration::seconds(TX_EXPIRATION_SECS),
            operations: Vec::new(),
            signers: Vec::new(),
        })
    }

    pub fn append_op(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub fn append_signer(&mut self, account: &str, authority: Authority) {
        self.signers.push((account.to_owned(), authority));
    }

    pub fn signers(&self) -> &[(String, Authority)] {
        &self.signers
    }

    /// The digest signatures commit to.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(STEEM_CHAIN_ID);
        hasher.update(self.wire_bytes());
        hasher.finalize().into()
    }

    /// Signs with one key per appended signer and seals the transaction.
    pub fn sign(self, keys: &[&PrivateKey]) -> Result<SignedTransaction, SignError> {
        if self.signers.is_empty() {
            return Err(SignError::NoSigners);
        }
        if keys.is_empty() {
            return Err(SignError::NoKeys);
        }

        let digest = self.digest();
        let mut signatures = Vec::with_capacity(keys.len());
        for key in keys {
            signatures.push(hex::encode(key.sign_canonical(&digest)?));
        }

        Ok(SignedTransaction {
            ref_block_num: self.ref_block_num,
            ref_block_prefix: self.ref_block_prefix,
            expiration: self.expiration.format(TIME_FORMAT).to_string(),
            operations: self.operations,
            extensions: Vec::new(),
            signatures,
        })
    }

    fn wire_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.ref_block_num.to_le_bytes());
        buf.extend_from_slice(&self.ref_block_prefix.to_le_bytes());
        let expiration = self.expiration.and_utc().timestamp() as u32;
        buf.extend_from_slice(&expiration.to_le_bytes());
        write_varint(&mut buf, self.operations.len() as u64);
        for op in &self.operations {
            op.encode(&mut buf);
        }
        write_varint(&mut buf, 0); // extensions
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::CustomJson;

    const WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";

    fn props() -> DynamicGlobalProperties {
        DynamicGlobalProperties {
            head_block_number: 0x0102_4567,
            head_block_id: "0102456709aefcf269bee3e1c1a2e3bca8a9a7f1".to_owned(),
            time: "2019-02-07T06:08:54".to_owned(),
        }
    }

    fn heist_op() -> Operation {
        Operation::CustomJson(CustomJson {
            required_auths: Vec::new(),
            required_posting_auths: vec!["alice".to_owned()],
            id: "dw-heist".to_owned(),
            json: r#"{"username":"alice","amount":"420"}"#.to_owned(),
        })
    }

    #[test]
    fn tapos_fields_come_from_the_head_block() {
        let builder = TransactionBuilder::new(&props()).unwrap();

        assert_eq!(builder.ref_block_num, 0x4567);
        // little-endian u32 over block id bytes 4..8
        assert_eq!(builder.ref_block_prefix, 0xf2fc_ae09);
    }

    #[test]
    fn expiration_trails_head_block_time() {
        let builder = TransactionBuilder::new(&props()).unwrap();
        let sealed = sealed_with_one_op(builder);

        assert_eq!(sealed.expiration, "2019-02-07T06:09:54");
    }

    #[test]
    fn rejects_short_block_id() {
        let mut bad = props();
        bad.head_block_id = "0102".to_owned();
        assert!(matches!(
            TransactionBuilder::new(&bad),
            Err(TxError::InvalidBlockId(_))
        ));
    }

    #[test]
    fn rejects_unparseable_time() {
        let mut bad = props();
        bad.time = "not a timestamp".to_owned();
        assert!(matches!(
            TransactionBuilder::new(&bad),
            Err(TxError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn digest_commits_to_the_operations() {
        let mut with_op = TransactionBuilder::new(&props()).unwrap();
        with_op.append_op(heist_op());
        let without_op = TransactionBuilder::new(&props()).unwrap();

        assert_ne!(with_op.digest(), without_op.digest());

        let mut same = TransactionBuilder::new(&props()).unwrap();
        same.append_op(heist_op());
        assert_eq!(with_op.digest(), same.digest());
    }

    #[test]
    fn refuses_to_sign_without_a_signer() {
        let key = PrivateKey::from_wif(WIF).unwrap();
        let mut builder = TransactionBuilder::new(&props()).unwrap();
        builder.append_op(heist_op());

        assert!(matches!(builder.sign(&[&key]), Err(SignError::NoSigners)));
    }

    #[test]
    fn refuses_to_sign_without_a_key() {
        let mut builder = TransactionBuilder::new(&props()).unwrap();
        builder.append_op(heist_op());
        builder.append_signer("alice", Authority::Posting);

        assert!(matches!(builder.sign(&[]), Err(SignError::NoKeys)));
    }

    #[test]
    fn sealed_transaction_carries_one_hex_signature() {
        let sealed = sealed_with_one_op(TransactionBuilder::new(&props()).unwrap());

        assert_eq!(sealed.operations.len(), 1);
        assert_eq!(sealed.signatures.len(), 1);
        // 65 bytes, hex-encoded
        assert_eq!(sealed.signatures[0].len(), 130);
        assert!(sealed.extensions.is_empty());
    }

    #[test]
    fn condenser_json_has_the_wire_field_names() {
        let sealed = sealed_with_one_op(TransactionBuilder::new(&props()).unwrap());
        let value = serde_json::to_value(&sealed).unwrap();

        assert_eq!(value["ref_block_num"], 0x4567);
        assert_eq!(value["operations"][0][0], "custom_json");
        assert!(value["signatures"][0].is_string());
    }

    fn sealed_with_one_op(mut builder: TransactionBuilder) -> SignedTransaction {
        let key = PrivateKey::from_wif(WIF).unwrap();
        builder.append_op(heist_op());
        builder.append_signer("alice", Authority::Posting);
        builder.sign(&[&key]).unwrap()
    }
}

//! JSON bodies returned by the algod REST API.
//!
//! Byte fields are standard base64. Fields algod omits when empty default to empty values.

use base64::{engine::general_purpose, Engine as _};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer};

use algo_spv_verify::{BlockHeader, Digest, ProofResponse};

/// Digest width of both transaction commitments
const COMMITMENT_SIZE: usize = 32;

/// `GET /v2/blocks/{round}?header-only=true`
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    pub block: BlockHeaderFields,
}

/// Subset of the block header relevant to transaction inclusion
#[derive(Debug, Clone, Deserialize)]
pub struct BlockHeaderFields {
    #[serde(default)]
    pub rnd: u64,
    #[serde(default)]
    pub gen: String,
    #[serde(default, deserialize_with = "deserialize_base64")]
    pub gh: Vec<u8>,
    /// SHA-512/256 transaction commitment, omitted when all zero
    #[serde(default, deserialize_with = "deserialize_base64")]
    pub txn: Vec<u8>,
    /// SHA-256 transaction commitment, absent on older blocks
    #[serde(default, deserialize_with = "deserialize_optional_base64")]
    pub txn256: Option<Vec<u8>>,
}

impl From<BlockHeaderFields> for BlockHeader {
    fn from(fields: BlockHeaderFields) -> Self {
        let txn_root = if fields.txn.is_empty() {
            Digest::zero(COMMITMENT_SIZE)
        } else {
            Digest::from(fields.txn)
        };
        BlockHeader {
            round: fields.rnd,
            genesis_hash: Digest::from(fields.gh),
            genesis_id: fields.gen,
            txn_root,
            txn_root_sha256: fields.txn256.map(Digest::from),
        }
    }
}

/// `GET /v2/blocks/{round}/transactions/{txid}/proof`
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionProofResponse {
    #[serde(default)]
    pub idx: u64,
    #[serde(default)]
    pub treedepth: u64,
    #[serde(default, deserialize_with = "deserialize_base64")]
    pub proof: Vec<u8>,
    #[serde(deserialize_with = "deserialize_base64")]
    pub stibhash: Vec<u8>,
    #[serde(default = "default_hashtype")]
    pub hashtype: String,
}

fn default_hashtype() -> String {
    "sha512_256".to_string()
}

impl From<TransactionProofResponse> for ProofResponse {
    fn from(response: TransactionProofResponse) -> Self {
        ProofResponse {
            idx: response.idx,
            treedepth: response.treedepth,
            proof: response.proof,
            stibhash: response.stibhash,
            hashtype: response.hashtype,
        }
    }
}

/// `GET /v2/status`
#[derive(Debug, Clone, Deserialize)]
pub struct NodeStatus {
    #[serde(rename = "last-round")]
    pub last_round: u64,
    #[serde(rename = "last-version", default)]
    pub last_version: String,
    #[serde(rename = "catchup-time", default)]
    pub catchup_time: u64,
}

/// Error body algod attaches to non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    general_purpose::STANDARD
        .decode(encoded)
        .map_err(SerdeError::custom)
}

pub fn deserialize_optional_base64<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(encoded) => general_purpose::STANDARD
            .decode(encoded)
            .map(Some)
            .map_err(SerdeError::custom),
        None => Ok(None),
    }
}

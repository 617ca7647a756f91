//! Types representing a transaction inclusion proof: the leaf inputs, the audit path, and the
//! self-contained bundle written to and read from disk.

use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::Digest;
use crate::error::VerifyError;
use crate::hash::HashAlgorithm;
use crate::provider::{BlockHeader, ProofResponse};
use crate::txid::decode_txid;

/// The two components hashed into a transaction tree leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafInputs {
    /// Identity digest of the transaction (the bytes behind its base32 id)
    pub transaction_id: Digest,
    /// Digest of the transaction as encoded in the block ("stib hash")
    pub encoded_txn_digest: Digest,
}

/// Audit path from a leaf to the root, as served by a proof provider.
///
/// Construction does not validate the path; [`crate::MerkleVerifier`] rejects paths whose
/// sibling count or leaf index disagree with the tree depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofPath {
    leaf_index: u64,
    tree_depth: u64,
    siblings: Vec<Digest>,
}

impl ProofPath {
    /// `siblings[0]` is the sibling just above the leaf, the last one sits just below the root.
    pub fn new(leaf_index: u64, tree_depth: u64, siblings: Vec<Digest>) -> Self {
        Self {
            leaf_index,
            tree_depth,
            siblings,
        }
    }

    /// Split a concatenated sibling buffer into `hash_size`-wide digests.
    pub fn from_concatenated(
        leaf_index: u64,
        tree_depth: u64,
        proof: &[u8],
        hash_size: usize,
    ) -> Result<Self, VerifyError> {
        if hash_size == 0 {
            return Err(VerifyError::MalformedProof(
                "hash size must be non-zero".to_string(),
            ));
        }
        if proof.len() % hash_size != 0 {
            return Err(VerifyError::MalformedProof(format!(
                "proof length {} is not a multiple of hash size {}",
                proof.len(),
                hash_size
            )));
        }
        let siblings = proof.chunks_exact(hash_size).map(Digest::from).collect();
        Ok(Self::new(leaf_index, tree_depth, siblings))
    }

    /// Build a path where absent siblings are replaced by the all-zero digest.
    pub fn from_optional_siblings(
        leaf_index: u64,
        tree_depth: u64,
        siblings: Vec<Option<Digest>>,
        hash_size: usize,
    ) -> Self {
        let siblings = siblings
            .into_iter()
            .map(|sibling| sibling.unwrap_or_else(|| Digest::zero(hash_size)))
            .collect();
        Self::new(leaf_index, tree_depth, siblings)
    }

    pub fn leaf_index(&self) -> u64 {
        self.leaf_index
    }

    pub fn tree_depth(&self) -> u64 {
        self.tree_depth
    }

    pub fn siblings(&self) -> &[Digest] {
        &self.siblings
    }
}

/// Algorand transaction inclusion data for a specific block, self-contained for offline checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInclusionProof {
    /// Round of the block that includes the transaction
    pub round: u64,
    /// Canonical base32 transaction id
    pub txid: String,
    /// Transaction commitment from the block header for `hash_type`
    pub txn_root: Digest,
    /// Hash scheme of the commitment and of the proof
    pub hash_type: HashAlgorithm,
    /// Position of the transaction in the block's payset
    pub leaf_index: u64,
    /// Number of levels between the leaf and the root
    pub tree_depth: u64,
    /// Concatenated sibling digests, leaf level first
    #[serde(serialize_with = "serialize_hex", deserialize_with = "deserialize_hex")]
    pub proof: Vec<u8>,
    /// Digest of the transaction as encoded in the block
    pub stib_hash: Digest,
}

impl TransactionInclusionProof {
    /// Pair a proof response with the header commitment it must reproduce.
    pub fn from_response(
        header: &BlockHeader,
        txid: &str,
        response: ProofResponse,
    ) -> Result<Self, VerifyError> {
        let hash_type: HashAlgorithm = response.hashtype.parse()?;
        let txn_root = header
            .txn_root_for(hash_type)
            .ok_or(VerifyError::MissingCommitment {
                round: header.round,
                algorithm: hash_type,
            })?
            .clone();

        Ok(Self {
            round: header.round,
            txid: txid.to_string(),
            txn_root,
            hash_type,
            leaf_index: response.idx,
            tree_depth: response.treedepth,
            proof: response.proof,
            stib_hash: Digest::from(response.stibhash),
        })
    }

    pub fn leaf_inputs(&self) -> Result<LeafInputs, VerifyError> {
        Ok(LeafInputs {
            transaction_id: decode_txid(&self.txid)?,
            encoded_txn_digest: self.stib_hash.clone(),
        })
    }

    pub fn proof_path(&self) -> Result<ProofPath, VerifyError> {
        ProofPath::from_concatenated(
            self.leaf_index,
            self.tree_depth,
            &self.proof,
            self.hash_type.digest_size(),
        )
    }
}

pub fn serialize_hex<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn deserialize_hex<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let hex_string = String::deserialize(deserializer)?;
    hex::decode(&hex_string).map_err(SerdeError::custom)
}

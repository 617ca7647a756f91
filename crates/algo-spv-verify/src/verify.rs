//! Verification of transaction inclusion proofs against a block's transaction commitment.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::encode::{internal_hash, leaf_hash, DomainTags};
use crate::error::VerifyError;
use crate::hash::HashAlgorithm;
use crate::proof::{LeafInputs, ProofPath, TransactionInclusionProof};

/// Configuration parameters controlling how leaves and nodes are hashed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Domain separation tag prepended to leaf payloads (ASCII)
    pub leaf_domain_tag: String,
    /// Domain separation tag prepended to internal node payloads (ASCII)
    pub node_domain_tag: String,
    /// Hash scheme requested from the proof provider when none is given explicitly
    pub default_hash_type: HashAlgorithm,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            leaf_domain_tag: "TL".to_string(),
            node_domain_tag: "MA".to_string(),
            default_hash_type: HashAlgorithm::Sha512_256,
        }
    }
}

impl VerifierConfig {
    pub fn domain_tags(&self) -> DomainTags {
        DomainTags {
            leaf: self.leaf_domain_tag.as_bytes().to_vec(),
            node: self.node_domain_tag.as_bytes().to_vec(),
        }
    }
}

/// Result of a successful transaction inclusion verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Transaction id that was verified
    pub txid: String,
    /// Round of the block containing the transaction
    pub round: u64,
    /// Transaction commitment the proof reproduced
    pub txn_root: Digest,
    /// Hash scheme of the commitment
    pub hash_type: HashAlgorithm,
    /// Position of the transaction in the block
    pub leaf_index: u64,
}

/// Node of the tree currently being climbed
struct LayerItem {
    position: u64,
    hash: Digest,
}

impl LayerItem {
    /// Combine with the sibling at this level and move one level up.
    fn up(self, sibling: &Digest, tags: &DomainTags, algorithm: HashAlgorithm) -> Self {
        let hash = if self.position & 1 == 0 {
            internal_hash(tags, &self.hash, sibling, algorithm)
        } else {
            internal_hash(tags, sibling, &self.hash, algorithm)
        };
        Self {
            position: self.position / 2,
            hash,
        }
    }
}

/// Recomputes Merkle roots from audit paths.
///
/// Holds no state besides its domain tags, so one verifier can be shared across threads and
/// reused for any number of proofs.
#[derive(Debug, Clone, Default)]
pub struct MerkleVerifier {
    tags: DomainTags,
}

impl MerkleVerifier {
    pub fn new(config: &VerifierConfig) -> Self {
        Self {
            tags: config.domain_tags(),
        }
    }

    pub fn with_tags(tags: DomainTags) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &DomainTags {
        &self.tags
    }

    /// Hash the leaf inputs, rejecting components of the wrong width.
    pub fn leaf_hash(
        &self,
        leaf: &LeafInputs,
        algorithm: HashAlgorithm,
    ) -> Result<Digest, VerifyError> {
        check_digest_length(&leaf.transaction_id, algorithm)?;
        check_digest_length(&leaf.encoded_txn_digest, algorithm)?;
        Ok(leaf_hash(&self.tags, leaf, algorithm))
    }

    /// Climb from `leaf_hash` to the candidate root.
    pub fn compute_root(
        &self,
        leaf_hash: &Digest,
        proof: &ProofPath,
        algorithm: HashAlgorithm,
    ) -> Result<Digest, VerifyError> {
        check_path(proof, algorithm)?;
        check_digest_length(leaf_hash, algorithm)?;
        Ok(self.climb(leaf_hash, proof, algorithm).hash)
    }

    /// Verify a precomputed leaf hash against `expected_root`.
    pub fn verify_leaf_hash(
        &self,
        expected_root: &Digest,
        leaf_hash: &Digest,
        proof: &ProofPath,
        algorithm: HashAlgorithm,
    ) -> Result<(), VerifyError> {
        check_path(proof, algorithm)?;
        check_digest_length(expected_root, algorithm)?;
        check_digest_length(leaf_hash, algorithm)?;
        let item = self.climb(leaf_hash, proof, algorithm);

        if item.position != 0 || &item.hash != expected_root {
            return Err(VerifyError::RootMismatch {
                expected: expected_root.clone(),
                computed: item.hash,
            });
        }

        Ok(())
    }

    /// Verify that `leaf` is included under `expected_root`.
    pub fn verify(
        &self,
        expected_root: &Digest,
        leaf: &LeafInputs,
        proof: &ProofPath,
        algorithm: HashAlgorithm,
    ) -> Result<(), VerifyError> {
        check_path(proof, algorithm)?;
        check_digest_length(expected_root, algorithm)?;
        let leaf_hash = self.leaf_hash(leaf, algorithm)?;
        self.verify_leaf_hash(expected_root, &leaf_hash, proof, algorithm)
    }

    /// Verify a self-contained proof bundle.
    pub fn verify_bundle(
        &self,
        proof: &TransactionInclusionProof,
    ) -> Result<VerificationResult, VerifyError> {
        let leaf = proof.leaf_inputs()?;
        let path = proof.proof_path()?;
        self.verify(&proof.txn_root, &leaf, &path, proof.hash_type)?;

        Ok(VerificationResult {
            txid: proof.txid.clone(),
            round: proof.round,
            txn_root: proof.txn_root.clone(),
            hash_type: proof.hash_type,
            leaf_index: proof.leaf_index,
        })
    }

    /// Callers validate the path and the leaf hash width first.
    fn climb(&self, leaf_hash: &Digest, proof: &ProofPath, algorithm: HashAlgorithm) -> LayerItem {
        let mut item = LayerItem {
            position: proof.leaf_index(),
            hash: leaf_hash.clone(),
        };
        for sibling in proof.siblings() {
            item = item.up(sibling, &self.tags, algorithm);
        }

        item
    }
}

/// Verify a proof bundle with the given configuration.
pub fn verify_transaction(
    proof: &TransactionInclusionProof,
    config: &VerifierConfig,
) -> Result<VerificationResult, VerifyError> {
    MerkleVerifier::new(config).verify_bundle(proof)
}

fn check_path(proof: &ProofPath, algorithm: HashAlgorithm) -> Result<(), VerifyError> {
    let depth = proof.tree_depth();
    if proof.siblings().len() as u64 != depth {
        return Err(VerifyError::MalformedProof(format!(
            "{} siblings for tree depth {}",
            proof.siblings().len(),
            depth
        )));
    }

    // Any u64 index fits a tree of depth 64 or more
    if depth < 64 && proof.leaf_index() >> depth != 0 {
        return Err(VerifyError::MalformedProof(format!(
            "leaf index {} out of range for tree depth {}",
            proof.leaf_index(),
            depth
        )));
    }

    let size = algorithm.digest_size();
    if let Some((level, sibling)) = proof
        .siblings()
        .iter()
        .enumerate()
        .find(|(_, sibling)| sibling.len() != size)
    {
        return Err(VerifyError::MalformedProof(format!(
            "sibling at level {} is {} bytes, expected {}",
            level,
            sibling.len(),
            size
        )));
    }

    Ok(())
}

fn check_digest_length(digest: &Digest, algorithm: HashAlgorithm) -> Result<(), VerifyError> {
    let expected = algorithm.digest_size();
    if digest.len() != expected {
        return Err(VerifyError::DigestLength {
            expected,
            actual: digest.len(),
        });
    }
    Ok(())
}

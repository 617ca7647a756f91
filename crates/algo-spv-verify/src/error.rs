use thiserror::Error;

use crate::digest::Digest;
use crate::hash::HashAlgorithm;

/// Error types for transaction inclusion verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Recomputed root differs from the root published in the block header
    #[error("Merkle root mismatch: expected {expected}, computed {computed}")]
    RootMismatch { expected: Digest, computed: Digest },
    /// Sibling count, leaf index or sibling width inconsistent with the declared tree depth
    #[error("Malformed proof: {0}")]
    MalformedProof(String),
    /// Proof names a hash scheme that is not implemented
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),
    /// Caller-supplied root or leaf component has the wrong width
    #[error("Invalid digest length: expected {expected} bytes, got {actual}")]
    DigestLength { expected: usize, actual: usize },
    /// Transaction id is not the base32 encoding of a digest
    #[error("Invalid transaction id: {0}")]
    InvalidTransactionId(String),
    /// Block header carries no transaction commitment for the requested scheme
    #[error("Block {round} has no {algorithm} transaction commitment")]
    MissingCommitment { round: u64, algorithm: HashAlgorithm },
}

impl VerifyError {
    /// True when the inputs are well formed but do not commit to the claimed root.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, VerifyError::RootMismatch { .. })
    }
}

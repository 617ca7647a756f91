//! Algorand SPV verification library
//!
//! This crate verifies that a transaction is included in a block by recomputing the
//! transaction Merkle root from an audit path served by an algod node.
//!
//! # Transaction Inclusion Proof
//!
//! Verification chains three steps:
//! 1. **Leaf**: the domain-tagged hash of the transaction id and the block-encoded transaction digest
//! 2. **Path**: one domain-tagged internal-node hash per sibling, left/right chosen by position parity
//! 3. **Root**: the candidate root must equal the commitment found in the block header
//!
//! Fetching headers and proofs is left to implementations of the [`provider`] traits.

pub mod batch;
pub mod digest;
pub mod encode;
pub mod error;
pub mod hash;
pub mod proof;
pub mod provider;
pub mod txid;
pub mod verify;

pub use batch::{verify_transactions, BatchOptions, BatchReport, TxnOutcome, TxnReport};
pub use digest::Digest;
pub use encode::{encode_leaf, encode_node, internal_hash, leaf_hash, DomainTags};
pub use error::VerifyError;
pub use hash::{HashAlgorithm, Hasher};
pub use proof::{LeafInputs, ProofPath, TransactionInclusionProof};
pub use provider::{fetch_inclusion_proof, BlockHeader, BlockProvider, ProofProvider, ProofResponse};
pub use txid::{decode_txid, encode_txid};
pub use verify::{verify_transaction, MerkleVerifier, VerificationResult, VerifierConfig};

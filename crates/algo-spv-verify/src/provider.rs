//! Collaborators supplying the data a verification needs: block header commitments and
//! transaction proofs. Both are fetched from a node; failures here are transport problems,
//! never verification verdicts.

use async_trait::async_trait;
use tracing::debug;

use crate::digest::Digest;
use crate::hash::HashAlgorithm;
use crate::proof::TransactionInclusionProof;

/// Block header fields relevant to transaction inclusion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block round
    pub round: u64,
    /// Genesis hash of the network
    pub genesis_hash: Digest,
    /// Genesis id of the network (e.g. `mainnet-v1.0`)
    pub genesis_id: String,
    /// SHA-512/256 transaction commitment
    pub txn_root: Digest,
    /// SHA-256 transaction commitment, absent on blocks predating it
    pub txn_root_sha256: Option<Digest>,
}

impl BlockHeader {
    /// Commitment the proof for `algorithm` must reproduce
    pub fn txn_root_for(&self, algorithm: HashAlgorithm) -> Option<&Digest> {
        match algorithm {
            HashAlgorithm::Sha512_256 => Some(&self.txn_root),
            HashAlgorithm::Sha256 => self.txn_root_sha256.as_ref(),
        }
    }
}

/// Transaction proof as returned by the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofResponse {
    /// Index of the transaction in the block's payset
    pub idx: u64,
    /// Depth of the transaction tree
    pub treedepth: u64,
    /// Concatenation of `treedepth` sibling digests
    pub proof: Vec<u8>,
    /// Digest of the transaction as encoded in the block
    pub stibhash: Vec<u8>,
    /// Hash scheme identifier
    pub hashtype: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockProvider: Send + Sync {
    /// Fetch the header of the block at `round`
    async fn block_header(&self, round: u64) -> anyhow::Result<BlockHeader>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProofProvider: Send + Sync {
    /// Fetch the inclusion proof of `txid` in the block at `round`
    async fn transaction_proof(
        &self,
        round: u64,
        txid: &str,
        algorithm: HashAlgorithm,
    ) -> anyhow::Result<ProofResponse>;
}

/// Fetch the header and the proof for `txid` and bundle them for offline verification.
pub async fn fetch_inclusion_proof<B, P>(
    block_provider: &B,
    proof_provider: &P,
    round: u64,
    txid: &str,
    algorithm: HashAlgorithm,
) -> anyhow::Result<TransactionInclusionProof>
where
    B: BlockProvider + ?Sized,
    P: ProofProvider + ?Sized,
{
    debug!("Fetching block header for round {} ...", round);
    let header = block_provider.block_header(round).await?;

    debug!("Fetching {} proof for {} ...", algorithm, txid);
    let response = proof_provider
        .transaction_proof(round, txid, algorithm)
        .await?;

    Ok(TransactionInclusionProof::from_response(
        &header, txid, response,
    )?)
}

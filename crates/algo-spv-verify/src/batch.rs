//! Verification of many transactions of one block.
//!
//! The header is fetched once; proofs are fetched concurrently and each one is verified as soon
//! as it arrives. Transport failures and verification failures are reported separately.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::error::VerifyError;
use crate::hash::HashAlgorithm;
use crate::proof::TransactionInclusionProof;
use crate::provider::{BlockHeader, BlockProvider, ProofProvider};
use crate::verify::{MerkleVerifier, VerificationResult, VerifierConfig};

/// Default number of proof requests in flight
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Options controlling a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Hash scheme requested from the proof provider
    pub algorithm: HashAlgorithm,
    /// Maximum number of proof requests in flight
    pub concurrency: usize,
    /// Stop at the first transaction that is not verified
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            concurrency: DEFAULT_CONCURRENCY,
            fail_fast: false,
        }
    }
}

/// Verdict for a single transaction
#[derive(Debug)]
pub enum TxnOutcome {
    /// The proof reproduced the block's commitment
    Verified(VerificationResult),
    /// The proof was obtained but does not verify
    Rejected(VerifyError),
    /// The proof could not be obtained
    Unavailable(anyhow::Error),
}

impl TxnOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, TxnOutcome::Verified(_))
    }
}

#[derive(Debug)]
pub struct TxnReport {
    pub txid: String,
    pub outcome: TxnOutcome,
}

/// Outcomes of a batch, in completion order
#[derive(Debug)]
pub struct BatchReport {
    pub round: u64,
    pub reports: Vec<TxnReport>,
}

impl BatchReport {
    pub fn verified_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| report.outcome.is_verified())
            .count()
    }

    pub fn all_verified(&self) -> bool {
        self.reports.iter().all(|report| report.outcome.is_verified())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TxnReport> {
        self.reports
            .iter()
            .filter(|report| !report.outcome.is_verified())
    }
}

/// Verify every transaction in `txids` against the block at `round`.
///
/// Returns an error only if the block header itself cannot be fetched; per-transaction
/// problems end up in the report.
pub async fn verify_transactions<B, P>(
    block_provider: &B,
    proof_provider: &P,
    round: u64,
    txids: &[String],
    config: &VerifierConfig,
    options: &BatchOptions,
) -> anyhow::Result<BatchReport>
where
    B: BlockProvider + ?Sized,
    P: ProofProvider + ?Sized,
{
    info!("Fetching block header for round {} ...", round);
    let header = block_provider.block_header(round).await?;
    if header.round != round {
        warn!(
            "Header for round {} reports round {}, requesting proofs for round {}",
            round, header.round, round
        );
    }
    info!(
        "Block {} of {}: txn root {}",
        header.round, header.genesis_id, header.txn_root
    );

    let verifier = MerkleVerifier::new(config);
    let mut pending = stream::iter(txids.iter())
        .map(|txid| {
            let header = &header;
            let verifier = &verifier;
            async move {
                let outcome =
                    verify_one(proof_provider, verifier, header, round, txid, options.algorithm)
                        .await;
                TxnReport {
                    txid: txid.clone(),
                    outcome,
                }
            }
        })
        .buffer_unordered(options.concurrency.max(1));

    let mut reports = Vec::with_capacity(txids.len());
    while let Some(report) = pending.next().await {
        match &report.outcome {
            TxnOutcome::Verified(result) => {
                info!("Verified: {} (index {})", report.txid, result.leaf_index)
            }
            TxnOutcome::Rejected(err) => warn!("Rejected: {}: {}", report.txid, err),
            TxnOutcome::Unavailable(err) => warn!("Unavailable: {}: {:#}", report.txid, err),
        }
        let failed = !report.outcome.is_verified();
        reports.push(report);
        if failed && options.fail_fast {
            warn!("Stopping after first failure");
            break;
        }
    }

    Ok(BatchReport { round, reports })
}

async fn verify_one<P>(
    proof_provider: &P,
    verifier: &MerkleVerifier,
    header: &BlockHeader,
    round: u64,
    txid: &str,
    algorithm: HashAlgorithm,
) -> TxnOutcome
where
    P: ProofProvider + ?Sized,
{
    let response = match proof_provider
        .transaction_proof(round, txid, algorithm)
        .await
    {
        Ok(response) => response,
        Err(err) => return TxnOutcome::Unavailable(err),
    };

    let verified = TransactionInclusionProof::from_response(header, txid, response)
        .and_then(|proof| verifier.verify_bundle(&proof));
    match verified {
        Ok(result) => TxnOutcome::Verified(result),
        Err(err) => TxnOutcome::Rejected(err),
    }
}

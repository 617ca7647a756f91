//! CLI wrappers for online batch verification and offline bundle verification

use clap::Args;
use std::path::PathBuf;

use algo_spv_verify::{
    verify_transaction, verify_transactions, BatchOptions, HashAlgorithm,
};
use tracing::info;

use crate::fetch::{load_inclusion_proof, load_verifier_config, NodeArgs};
use crate::format::{format_batch_report, format_verification};

/// CLI arguments for the `verify` subcommand
#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// Round of the block containing the transactions
    #[arg(long)]
    round: u64,
    /// Transaction IDs (base32), repeat or separate with commas
    #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
    txid: Vec<String>,
    /// Hash scheme of the proofs (sha512_256 or sha256)
    #[arg(long)]
    hash_type: Option<HashAlgorithm>,
    /// Maximum number of proof requests in flight
    #[arg(long, default_value = "8")]
    concurrency: usize,
    /// Stop at the first transaction that fails to verify
    #[arg(long, default_value = "false")]
    fail_fast: bool,
    /// Path to verifier config JSON file (optional, uses defaults if not provided)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// CLI arguments for the `verify-file` subcommand
#[derive(Clone, Debug, Args)]
pub struct VerifyFileArgs {
    /// Path to read the proof from
    proof_file: PathBuf,
    /// Path to verifier config JSON file (optional, uses defaults if not provided)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Run the `verify` subcommand: fetch and verify proofs for every transaction
pub async fn run(args: VerifyArgs, node: &NodeArgs) -> Result<(), anyhow::Error> {
    let config = load_verifier_config(args.config.as_deref())?;
    let options = BatchOptions {
        algorithm: args.hash_type.unwrap_or(config.default_hash_type),
        concurrency: args.concurrency,
        fail_fast: args.fail_fast,
    };
    let client = node.client()?;

    info!(
        "Verifying {} transaction(s) in round {} ...",
        args.txid.len(),
        args.round
    );
    let report =
        verify_transactions(&client, &client, args.round, &args.txid, &config, &options).await?;
    println!("{}", format_batch_report(&report));

    if !report.all_verified() {
        return Err(anyhow::anyhow!(
            "{} of {} transaction(s) not verified",
            args.txid.len() - report.verified_count(),
            args.txid.len()
        ));
    }
    Ok(())
}

/// Run the `verify-file` subcommand: read a proof bundle from disk and verify it
pub fn run_file(args: VerifyFileArgs) -> Result<(), anyhow::Error> {
    let proof = load_inclusion_proof(&args.proof_file)?;
    let config = load_verifier_config(args.config.as_deref())?;

    let result = verify_transaction(&proof, &config)?;
    println!("{}", format_verification(&result));
    Ok(())
}

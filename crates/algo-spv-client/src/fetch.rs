//! Fetching transaction inclusion proofs from an algod node and storing them on disk.

use std::path::{Path, PathBuf};

use algo_spv_verify::{
    fetch_inclusion_proof, verify_transaction, HashAlgorithm, TransactionInclusionProof,
    VerifierConfig,
};
use algod_client::AlgodClient;
use tracing::info;

use crate::format::format_verification;

/// Algod connection flags shared by the networked subcommands
#[derive(Clone, Debug, clap::Args)]
pub struct NodeArgs {
    /// Algod REST endpoint
    #[arg(
        long,
        env = "ALGOD_ADDRESS",
        default_value = "https://mainnet-api.algonode.cloud",
        global = true
    )]
    pub algod_url: String,
    /// Algod API token (optional)
    #[arg(long, env = "ALGOD_TOKEN", global = true)]
    pub algod_token: Option<String>,
}

impl NodeArgs {
    pub fn client(&self) -> Result<AlgodClient, anyhow::Error> {
        Ok(AlgodClient::new(
            self.algod_url.clone(),
            self.algod_token.clone(),
        )?)
    }
}

/// CLI arguments for the `get-proof` subcommand
#[derive(Clone, Debug, clap::Args)]
pub struct GetProofArgs {
    /// Round of the block containing the transaction
    #[arg(long)]
    round: u64,
    /// Transaction ID (base32)
    #[arg(long)]
    txid: String,
    /// Hash scheme of the proof (sha512_256 or sha256)
    #[arg(long)]
    hash_type: Option<HashAlgorithm>,
    /// Path to save the proof (printed to stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Verify the proof after fetching it
    #[arg(long, default_value = "false")]
    verify: bool,
    /// Path to verifier config JSON file (optional, uses defaults if not provided)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Run the `get-proof` subcommand: fetch a proof bundle and write it out
pub async fn run(args: GetProofArgs, node: &NodeArgs) -> Result<(), anyhow::Error> {
    let config = load_verifier_config(args.config.as_deref())?;
    let algorithm = args.hash_type.unwrap_or(config.default_hash_type);

    info!(
        "Fetching {} proof for {} in round {} ...",
        algorithm, args.txid, args.round
    );
    let client = node.client()?;
    let proof = fetch_inclusion_proof(&client, &client, args.round, &args.txid, algorithm)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch transaction proof: {:#}", e))?;

    match &args.output {
        Some(path) => save_inclusion_proof(&proof, path)?,
        None => println!("{}", serde_json::to_string_pretty(&proof)?),
    }

    if args.verify {
        let result = verify_transaction(&proof, &config)?;
        println!("{}", format_verification(&result));
    }

    Ok(())
}

/// Run the `head` subcommand: print the node's last round
pub async fn run_head(node: &NodeArgs) -> Result<(), anyhow::Error> {
    let status = node.client()?.get_status().await?;
    info!("Node at {} is at round {}", node.algod_url, status.last_round);
    println!("{}", status.last_round);
    Ok(())
}

/// Save a proof bundle to disk as pretty-printed JSON, creating parent directories
pub fn save_inclusion_proof(
    proof: &TransactionInclusionProof,
    proof_path: &Path,
) -> Result<(), anyhow::Error> {
    if let Some(proof_dir) = proof_path.parent() {
        std::fs::create_dir_all(proof_dir)?;
    }
    let json = serde_json::to_string_pretty(proof)?;
    std::fs::write(proof_path, json)?;
    info!("Proof written to {}", proof_path.display());
    Ok(())
}

/// Load a proof bundle saved by [`save_inclusion_proof`]
pub fn load_inclusion_proof(proof_path: &Path) -> Result<TransactionInclusionProof, anyhow::Error> {
    info!("Loading proof from {}", proof_path.display());
    let data = std::fs::read_to_string(proof_path)?;
    let proof = serde_json::from_str(&data)
        .map_err(|e| anyhow::anyhow!("Invalid proof file {}: {}", proof_path.display(), e))?;
    Ok(proof)
}

/// Load the verifier config from a JSON file, or fall back to the defaults
pub fn load_verifier_config(config_path: Option<&Path>) -> Result<VerifierConfig, anyhow::Error> {
    match config_path {
        Some(path) => {
            info!("Loading verifier config from {}", path.display());
            let config_data = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&config_data)?)
        }
        None => {
            info!("Using default verifier config");
            Ok(VerifierConfig::default())
        }
    }
}

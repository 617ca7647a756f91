//! Algorand SPV Client Library
//!
//! This library fetches transaction inclusion proofs from an algod node, stores them as
//! self-contained JSON bundles and verifies them online or offline.

pub mod fetch;
pub mod format;
pub mod verify;

pub use fetch::{load_inclusion_proof, load_verifier_config, save_inclusion_proof};

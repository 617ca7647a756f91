//! Hash schemes used to commit to a block's transactions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::digest::DynDigest;
use sha2::{Sha256, Sha512_256};

use crate::digest::Digest;
use crate::error::VerifyError;

/// Hash algorithm named by the proof provider's `hashtype` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-512 truncated to 256 bits, the block's native `txn` commitment
    #[default]
    #[serde(rename = "sha512_256")]
    Sha512_256,
    /// SHA-256, the block's `txn256` commitment
    #[serde(rename = "sha256")]
    Sha256,
}

impl HashAlgorithm {
    /// Identifier as it appears in proof responses and query strings
    pub const fn id(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha512_256 => "sha512_256",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Output size in bytes
    pub const fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha512_256 => 32,
            HashAlgorithm::Sha256 => 32,
        }
    }

    pub fn new_hasher(&self) -> Hasher {
        let inner: Box<dyn DynDigest + Send> = match self {
            HashAlgorithm::Sha512_256 => Box::new(Sha512_256::default()),
            HashAlgorithm::Sha256 => Box::new(Sha256::default()),
        };
        Hasher { inner }
    }

    /// Hash `tag || payload` in one go.
    pub fn hash_tagged(&self, tag: &[u8], payload: &[u8]) -> Digest {
        let mut hasher = self.new_hasher();
        hasher.write(tag);
        hasher.write(payload);
        hasher.finish()
    }
}

impl FromStr for HashAlgorithm {
    type Err = VerifyError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id {
            "sha512_256" => Ok(HashAlgorithm::Sha512_256),
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(VerifyError::UnsupportedHashAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Stateful hasher for one [`HashAlgorithm`]
pub struct Hasher {
    inner: Box<dyn DynDigest + Send>,
}

impl Hasher {
    /// Resolve `algorithm_id` and start a new hasher.
    pub fn new(algorithm_id: &str) -> Result<Self, VerifyError> {
        Ok(algorithm_id.parse::<HashAlgorithm>()?.new_hasher())
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    pub fn finish(self) -> Digest {
        Digest::from(self.inner.finalize().into_vec())
    }
}

//! Fixed-width digest values exchanged between proof providers and the verifier.

use std::fmt;

use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Output of a hash scheme.
///
/// The width is not part of the type: it is fixed by the [`crate::HashAlgorithm`] in use and
/// checked by the verifier, so every digest taking part in one verification has the same length.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// All-zero digest of `size` bytes, standing in for a missing child.
    pub fn zero(size: usize) -> Self {
        Self(vec![0u8; size])
    }

    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        hex::decode(hex).map(Self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Digest {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Digest {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_string = String::deserialize(deserializer)?;
        Digest::from_hex(&hex_string).map_err(SerdeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_digest() {
        let zero = Digest::zero(32);
        assert_eq!(zero.len(), 32);
        assert!(zero.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_hex_display_and_prefix() {
        let digest = Digest::from([0xab; 4]);
        assert_eq!(digest.to_string(), "abababab");
        assert_eq!(Digest::from_hex("0xabababab").unwrap(), digest);
        assert!(Digest::from_hex("zz").is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let digest = Digest::from([0x01, 0x02, 0xff]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, "\"0102ff\"");
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
        assert!(serde_json::from_str::<Digest>("\"not hex\"").is_err());
    }
}

//! Canonical transaction id strings.
//!
//! An id is the unpadded RFC 4648 base32 encoding of the transaction's identity digest. Deriving
//! the digest from transaction contents is the node's job; here it is only decoded.

use data_encoding::BASE32_NOPAD;

use crate::digest::Digest;
use crate::error::VerifyError;

/// Size of a transaction identity digest in bytes
pub const TXID_DIGEST_SIZE: usize = 32;

/// Decode a transaction id string into the identity digest hashed into the leaf.
pub fn decode_txid(txid: &str) -> Result<Digest, VerifyError> {
    let bytes = BASE32_NOPAD
        .decode(txid.as_bytes())
        .map_err(|e| VerifyError::InvalidTransactionId(format!("{txid}: {e}")))?;
    if bytes.len() != TXID_DIGEST_SIZE {
        return Err(VerifyError::InvalidTransactionId(format!(
            "{txid}: decodes to {} bytes, expected {TXID_DIGEST_SIZE}",
            bytes.len()
        )));
    }
    Ok(Digest::from(bytes))
}

pub fn encode_txid(digest: &Digest) -> String {
    BASE32_NOPAD.encode(digest.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_txid() {
        let txid = "AEBAGBAFAYDQQCIKBMGA2DQPCAIREEYUCULBOGAZDINRYHI6D4QA";
        let digest = decode_txid(txid).unwrap();
        let expected: Vec<u8> = (1..=32).collect();
        assert_eq!(digest.as_bytes(), expected.as_slice());
        assert_eq!(encode_txid(&digest), txid);
    }

    #[test]
    fn test_invalid_txids() {
        // Lowercase is not canonical
        assert!(matches!(
            decode_txid("aebagbafaydqqcikbmga2dqpcaireeyuculbogazdinryhi6d4qa"),
            Err(VerifyError::InvalidTransactionId(_))
        ));
        // Valid base32 of the wrong length
        assert!(matches!(
            decode_txid("AEBAGBA"),
            Err(VerifyError::InvalidTransactionId(_))
        ));
        assert!(decode_txid("").is_err());
    }
}

//! Domain-tagged byte layouts hashed for transaction tree leaves and internal nodes.
//!
//! Each encoder returns the domain tag and the payload separately; the hashed bytes are always
//! `tag || payload` with no separators or length prefixes.

use crate::digest::Digest;
use crate::hash::HashAlgorithm;
use crate::proof::LeafInputs;

/// Default domain separation tag for transaction tree leaves
pub const TXN_MERKLE_LEAF_TAG: &[u8] = b"TL";

/// Default domain separation tag for Merkle array internal nodes
pub const MERKLE_ARRAY_NODE_TAG: &[u8] = b"MA";

/// Domain separation tags applied to leaves and internal nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTags {
    pub leaf: Vec<u8>,
    pub node: Vec<u8>,
}

impl Default for DomainTags {
    fn default() -> Self {
        Self {
            leaf: TXN_MERKLE_LEAF_TAG.to_vec(),
            node: MERKLE_ARRAY_NODE_TAG.to_vec(),
        }
    }
}

/// Leaf layout: transaction id followed by the block-encoded transaction digest.
pub fn encode_leaf<'a>(tags: &'a DomainTags, leaf: &LeafInputs) -> (&'a [u8], Vec<u8>) {
    let mut payload =
        Vec::with_capacity(leaf.transaction_id.len() + leaf.encoded_txn_digest.len());
    payload.extend_from_slice(leaf.transaction_id.as_bytes());
    payload.extend_from_slice(leaf.encoded_txn_digest.as_bytes());
    (tags.leaf.as_slice(), payload)
}

/// Internal node layout: left child followed by right child.
pub fn encode_node<'a>(tags: &'a DomainTags, left: &Digest, right: &Digest) -> (&'a [u8], Vec<u8>) {
    let mut payload = Vec::with_capacity(left.len() + right.len());
    payload.extend_from_slice(left.as_bytes());
    payload.extend_from_slice(right.as_bytes());
    (tags.node.as_slice(), payload)
}

pub fn leaf_hash(tags: &DomainTags, leaf: &LeafInputs, algorithm: HashAlgorithm) -> Digest {
    let (tag, payload) = encode_leaf(tags, leaf);
    algorithm.hash_tagged(tag, &payload)
}

pub fn internal_hash(
    tags: &DomainTags,
    left: &Digest,
    right: &Digest,
    algorithm: HashAlgorithm,
) -> Digest {
    let (tag, payload) = encode_node(tags, left, right);
    algorithm.hash_tagged(tag, &payload)
}

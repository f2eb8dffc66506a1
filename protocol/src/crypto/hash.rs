//! # Hashing Utilities
//!
//! Ethereum hashes everything with Keccak-256: transaction ids, signing
//! hashes, addresses. Note that this is the original Keccak submission, not
//! the padded NIST SHA3-256. The two produce different digests for the same
//! input, and mixing them up is a rite of passage nobody needs to repeat.
//!
//! [`rlp_hash`] is the one the transaction core actually calls: it hashes the
//! RLP encoding of a list of byte strings, so field boundaries are part of
//! the digest (hashing a flat concatenation would let `["ab", "c"]` collide
//! with `["a", "bc"]`).

use ethereum_types::H256;
use sha3::{Digest, Keccak256};

use crate::transaction::codec;

/// Keccak-256 digest of `data`.
///
/// # Example
///
/// ```
/// use ethtx_protocol::crypto::keccak256;
///
/// let empty = keccak256(b"");
/// assert_eq!(
///     hex::encode(empty),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_slice(&hasher.finalize())
}

/// Keccak-256 of the RLP encoding of an ordered list of byte strings.
pub fn rlp_hash<T: AsRef<[u8]>>(items: &[T]) -> H256 {
    keccak256(&codec::encode_list(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_known_vector() {
        // keccak256("hello"), the usual tutorial vector.
        assert_eq!(
            hex::encode(keccak256(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn keccak_is_not_sha3() {
        let sha3_empty = "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a";
        assert_ne!(hex::encode(keccak256(b"")), sha3_empty);
    }

    #[test]
    fn rlp_hash_respects_field_boundaries() {
        let a = rlp_hash(&[b"ab".to_vec(), b"c".to_vec()]);
        let b = rlp_hash(&[b"a".to_vec(), b"bc".to_vec()]);
        assert_ne!(a, b);
    }

    #[test]
    fn rlp_hash_of_empty_list() {
        // keccak256(0xc0), the well-known empty-list hash (ommers hash of an
        // empty block body).
        let empty: [&[u8]; 0] = [];
        assert_eq!(
            hex::encode(rlp_hash(&empty)),
            "1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347"
        );
    }
}

//! # Digital Signatures
//!
//! Recoverable secp256k1 ECDSA over 32-byte digests.
//!
//! Signing is deterministic (RFC 6979) and always yields a low-s signature,
//! because that is what libsecp256k1 does. Recovery, on the other hand, is
//! lenient: it accepts high-s signatures too. Whether a high `s` is allowed
//! is a consensus rule that depends on the hardfork, so it is the caller's
//! job to check [`is_low_s`] first.
//!
//! `v` comes out of [`ecsign`] in the pre-EIP-155 form, `27 + recovery_id`.
//! Folding a chain id into it is a transaction concern, not a crypto one.

use ethereum_types::{H256, U256};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SECP256K1};
use thiserror::Error;

use super::keys::{EthKeypair, PublicKey};
use crate::config::{LEGACY_V_OFFSET, SECP256K1N_HALF, WORD_LENGTH};

/// Errors during signing or recovery.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid recovery id {0}: must be 0 or 1")]
    InvalidRecoveryId(u64),

    #[error("malformed signature: {0}")]
    Malformed(&'static str),

    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// A signature as it lands in a legacy transaction: `v ∈ {27, 28}`, `r` and
/// `s` as 32-byte big-endian words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl EcdsaSignature {
    /// Raw recovery id (`v - 27`).
    pub fn recovery_id(&self) -> u64 {
        self.v - LEGACY_V_OFFSET
    }
}

/// Signs a 32-byte digest.
///
/// # Example
///
/// ```
/// use ethtx_protocol::crypto::{ecrecover, ecsign, keccak256, EthKeypair};
///
/// let kp = EthKeypair::generate();
/// let digest = keccak256(b"legacy tx");
/// let sig = ecsign(&digest, &kp).unwrap();
/// let recovered = ecrecover(&digest, sig.recovery_id(), &sig.r, &sig.s).unwrap();
/// assert_eq!(recovered, kp.public_key());
/// ```
pub fn ecsign(digest: &H256, keypair: &EthKeypair) -> Result<EcdsaSignature, SignatureError> {
    let msg = Message::from_digest_slice(digest.as_bytes())
        .map_err(|_| SignatureError::Malformed("digest must be 32 bytes"))?;
    let sig = SECP256K1.sign_ecdsa_recoverable(&msg, keypair.secret_key());
    let (recid, compact) = sig.serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    Ok(EcdsaSignature {
        v: LEGACY_V_OFFSET + recid.to_i32() as u64,
        r,
        s,
    })
}

/// Recovers the signer's public key from a digest, a raw recovery id and
/// big-endian `r`, `s` (minimal encodings are fine, they get left-padded).
pub fn ecrecover(
    digest: &H256,
    recovery_id: u64,
    r: &[u8],
    s: &[u8],
) -> Result<PublicKey, SignatureError> {
    if recovery_id > 1 {
        return Err(SignatureError::InvalidRecoveryId(recovery_id));
    }
    let recid = RecoveryId::from_i32(recovery_id as i32)
        .map_err(|_| SignatureError::InvalidRecoveryId(recovery_id))?;

    let r = left_pad_word(r).ok_or(SignatureError::Malformed("r too long"))?;
    let s = left_pad_word(s).ok_or(SignatureError::Malformed("s too long"))?;
    // The compact parser only checks the upper bound.
    if r == [0u8; WORD_LENGTH] || s == [0u8; WORD_LENGTH] {
        return Err(SignatureError::Malformed("r and s must be non-zero"));
    }

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&r);
    compact[32..].copy_from_slice(&s);

    let sig = RecoverableSignature::from_compact(&compact, recid)
        .map_err(|_| SignatureError::Malformed("r or s out of range"))?;
    let msg = Message::from_digest_slice(digest.as_bytes())
        .map_err(|_| SignatureError::Malformed("digest must be 32 bytes"))?;
    let pk = SECP256K1
        .recover_ecdsa(&msg, &sig)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(PublicKey::from_secp(&pk))
}

/// `true` if `s <= secp256k1n / 2` (EIP-2). Anything wider than a word is
/// by definition not low.
pub fn is_low_s(s: &[u8]) -> bool {
    match left_pad_word(s) {
        Some(word) => U256::from_big_endian(&word) <= U256::from_big_endian(&SECP256K1N_HALF),
        None => false,
    }
}

/// Left-pads a big-endian integer to a 32-byte word, ignoring leading zeros.
fn left_pad_word(bytes: &[u8]) -> Option<[u8; WORD_LENGTH]> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let bytes = &bytes[first..];
    if bytes.len() > WORD_LENGTH {
        return None;
    }
    let mut word = [0u8; WORD_LENGTH];
    word[WORD_LENGTH - bytes.len()..].copy_from_slice(bytes);
    Some(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SECP256K1N;
    use crate::crypto::hash::keccak256;

    fn key_46() -> EthKeypair {
        EthKeypair::from_bytes(&[0x46; 32]).unwrap()
    }

    #[test]
    fn eip155_reference_signature() {
        // The worked example from EIP-155 itself.
        let digest = H256::from_slice(
            &hex::decode("daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53")
                .unwrap(),
        );
        let sig = ecsign(&digest, &key_46()).unwrap();
        assert_eq!(sig.v, 27);
        assert_eq!(
            hex::encode(sig.r),
            "28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276"
        );
        assert_eq!(
            hex::encode(sig.s),
            "67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
    }

    #[test]
    fn sign_then_recover() {
        let kp = EthKeypair::generate();
        let digest = keccak256(b"sign then recover");
        let sig = ecsign(&digest, &kp).unwrap();
        assert!(sig.v == 27 || sig.v == 28);
        assert!(is_low_s(&sig.s));
        let pk = ecrecover(&digest, sig.recovery_id(), &sig.r, &sig.s).unwrap();
        assert_eq!(pk, kp.public_key());
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = key_46();
        let digest = keccak256(b"rfc6979");
        assert_eq!(ecsign(&digest, &kp).unwrap(), ecsign(&digest, &kp).unwrap());
    }

    #[test]
    fn wrong_recovery_id_recovers_someone_else() {
        let kp = EthKeypair::generate();
        let digest = keccak256(b"forged recovery id");
        let sig = ecsign(&digest, &kp).unwrap();
        let flipped = 1 - sig.recovery_id();
        match ecrecover(&digest, flipped, &sig.r, &sig.s) {
            Ok(pk) => assert_ne!(pk, kp.public_key()),
            Err(e) => assert_eq!(e, SignatureError::RecoveryFailed),
        }
    }

    #[test]
    fn rejects_out_of_range_recovery_id() {
        let digest = keccak256(b"x");
        assert_eq!(
            ecrecover(&digest, 2, &[1u8; 32], &[1u8; 32]),
            Err(SignatureError::InvalidRecoveryId(2))
        );
        assert_eq!(
            ecrecover(&digest, 27, &[1u8; 32], &[1u8; 32]),
            Err(SignatureError::InvalidRecoveryId(27))
        );
    }

    #[test]
    fn rejects_malformed_components() {
        let digest = keccak256(b"x");
        // Zero r or s, minimal or padded.
        for (r, s) in [
            (&[][..], &[1u8; 32][..]),
            (&[0u8; 32][..], &[1u8; 32][..]),
            (&[1u8; 32][..], &[][..]),
        ] {
            assert_eq!(
                ecrecover(&digest, 0, r, s),
                Err(SignatureError::Malformed("r and s must be non-zero"))
            );
        }
        // r = n is out of range.
        assert!(matches!(
            ecrecover(&digest, 0, &SECP256K1N, &[1u8; 32]),
            Err(SignatureError::Malformed(_))
        ));
        assert!(matches!(
            ecrecover(&digest, 0, &[1u8; 33], &[1u8; 32]),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn low_s_boundary() {
        assert!(is_low_s(&SECP256K1N_HALF));
        assert!(is_low_s(&[]));
        assert!(is_low_s(&[0x01]));

        let mut above = SECP256K1N_HALF;
        above[31] += 1;
        assert!(!is_low_s(&above));
        assert!(!is_low_s(&SECP256K1N));
        assert!(!is_low_s(&[0xff; 33]));
    }

    #[test]
    fn left_pad_handles_leading_zeros() {
        let mut padded = [0u8; 33];
        padded[32] = 7;
        let word = left_pad_word(&padded).unwrap();
        assert_eq!(word[31], 7);
        assert_eq!(left_pad_word(&[]).unwrap(), [0u8; 32]);
    }
}

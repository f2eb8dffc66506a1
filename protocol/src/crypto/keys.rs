//! # Key Management
//!
//! secp256k1 keypairs and the public-key → address derivation.
//!
//! An Ethereum account is nothing more than the last 20 bytes of the
//! Keccak-256 of the signer's uncompressed public key (without the `0x04`
//! prefix). Transactions never carry the public key; it is recovered from
//! the signature, which is why recovery lives next door in
//! [`super::signatures`].
//!
//! ## Security considerations
//!
//! - Key generation uses `OsRng`.
//! - `Debug` prints the address, never the secret.
//! - Key bytes are never logged. Keep it that way.

use ethereum_types::Address;
use rand::rngs::OsRng;
use secp256k1::{SecretKey, SECP256K1};
use std::fmt;
use thiserror::Error;

use super::hash::keccak256;

/// Length of an uncompressed secp256k1 public key without the SEC1 prefix.
pub const PUBLIC_KEY_LENGTH: usize = 64;

/// Errors that can occur during key operations.
///
/// Deliberately vague about *why* a secret was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid secret key: must be 32 bytes and a valid secp256k1 scalar")]
    InvalidSecretKey,

    #[error("invalid public key: not a point on secp256k1")]
    InvalidPublicKey,
}

// ---------------------------------------------------------------------------
// EthKeypair
// ---------------------------------------------------------------------------

/// A secp256k1 signing key.
///
/// `EthKeypair` intentionally does NOT implement `Serialize`. Exporting a
/// private key should be a deliberate call to [`secret_bytes`](Self::secret_bytes).
///
/// # Examples
///
/// ```
/// use ethtx_protocol::crypto::EthKeypair;
///
/// let kp = EthKeypair::from_hex(
///     "0x4646464646464646464646464646464646464646464646464646464646464646",
/// )
/// .unwrap();
/// assert_eq!(
///     format!("{:?}", kp.address()),
///     "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct EthKeypair {
    secret: SecretKey,
}

impl EthKeypair {
    /// Fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            secret: SecretKey::new(&mut OsRng),
        }
    }

    /// Key from raw 32-byte secret material. Zero and values at or above the
    /// group order are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { secret })
    }

    /// Key from hex, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_bytes(&bytes)
    }

    /// Raw secret. Handle with care.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub fn public_key(&self) -> PublicKey {
        let pk = secp256k1::PublicKey::from_secret_key(SECP256K1, &self.secret);
        PublicKey::from_secp(&pk)
    }

    /// Account address controlled by this key.
    pub fn address(&self) -> Address {
        public_to_address(&self.public_key())
    }
}

impl fmt::Debug for EthKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthKeypair(address={:?})", self.address())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// An uncompressed secp256k1 public key: `x || y`, 64 bytes, no prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    pub(crate) fn from_secp(pk: &secp256k1::PublicKey) -> Self {
        let uncompressed = pk.serialize_uncompressed();
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(&uncompressed[1..]);
        Self { bytes }
    }

    /// Parses 64 raw bytes, checking that they are a curve point.
    pub fn from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut sec1 = [0u8; PUBLIC_KEY_LENGTH + 1];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(slice);
        let pk = secp256k1::PublicKey::from_slice(&sec1).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self::from_secp(&pk))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", &self.to_hex()[..16])
    }
}

/// Account address of a public key: `keccak256(x || y)[12..]`.
pub fn public_to_address(public_key: &PublicKey) -> Address {
    let hash = keccak256(public_key.as_bytes());
    Address::from_slice(&hash.as_bytes()[12..])
}

//! # Cryptographic Primitives
//!
//! Everything a legacy transaction needs from cryptography, and nothing else:
//!
//! - **Keccak-256** for transaction hashes, signing hashes and addresses.
//! - **secp256k1** keypairs.
//! - **Recoverable ECDSA** so the sender can be derived from `(v, r, s)`
//!   alone. Transactions never carry a public key.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Everything here is a thin, type-safe wrapper around
//! libsecp256k1 and the RustCrypto Keccak. If you're tempted to optimize
//! these functions, please reconsider. Then reconsider again.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{keccak256, rlp_hash};
pub use keys::{public_to_address, EthKeypair, KeyError, PublicKey};
pub use signatures::{ecrecover, ecsign, is_low_s, EcdsaSignature, SignatureError};

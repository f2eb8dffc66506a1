//! Error type for everything a [`Transaction`](super::Transaction) can refuse.
//!
//! Construction errors abort construction; there is no half-built
//! transaction. Signature checks are the exception: `verify_signature` and
//! `validate` answer with a `bool` and never produce one of these.

use thiserror::Error;

use super::types::Field;
use crate::chain::Hardfork;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// A ready-made chain context was passed together with a chain name or
    /// hardfork. Pick one.
    #[error("instantiation with both a chain context and a chain or hardfork parameter is not allowed")]
    ConfigurationConflict,

    /// A variable-length numeric field is wider than its maximum.
    #[error("the field {field} must not have more than {max} bytes, got {actual}")]
    FieldLength {
        field: Field,
        max: usize,
        actual: usize,
    },

    /// A fixed-width field (the recipient address) has the wrong width.
    #[error("the field {field} must have byte length of {expected}, got {actual}")]
    FieldWidth {
        field: Field,
        expected: usize,
        actual: usize,
    },

    /// More values than a legacy transaction has fields.
    #[error("wrong number of fields in data: at most {max} allowed, got {actual}")]
    FieldCount { max: usize, actual: usize },

    /// The serialized form is not a well-formed list of byte strings.
    #[error("malformed transaction encoding: {0}")]
    Decode(#[from] rlp::DecoderError),

    /// `v` encodes a chain id that does not fit in 64 bits.
    #[error("chain id encoded in v does not fit in 64 bits")]
    ChainIdOutOfRange,

    /// The sender cannot be recovered from the signature.
    #[error("Invalid Signature")]
    InvalidSignature,

    /// The transaction already carries a signature for a different chain.
    #[error("transaction is signed for chain {encoded} but resolved to chain {resolved}")]
    ChainIdMismatch { resolved: u64, encoded: u64 },

    /// A chain id is set but the rule set predates EIP-155, so an EIP-155
    /// signature could not be verified.
    #[error("cannot sign for chain {chain_id} under {hardfork}: replay protection is not active")]
    ReplayProtectionInactive { chain_id: u64, hardfork: Hardfork },

    /// The ECDSA signer rejected the signing hash.
    #[error("signing failed: {0}")]
    Signing(String),
}

//! # Transaction Module
//!
//! Legacy Ethereum transactions: nine byte strings, an RLP wire form, a
//! signing hash that may or may not cover the chain id, and a sender that
//! exists only as the output of signature recovery.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        Field names and rules, structured input (TxData)
//! fields.rs       Canonicalization of every incoming value
//! codec.rs        RLP encode/decode of the raw field list
//! builder.rs      Transaction, TxInput, TxOptions, construction & accessors
//! signing.rs      Transaction/signing hashes, EIP-155 form selection, sign()
//! verification.rs Signature verification and sender recovery
//! fees.rs         Intrinsic gas, upfront cost, validation
//! json.rs         JSON view
//! error.rs        TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** from RLP, an ordered field list, or [`TxData`], under
//!    [`TxOptions`].
//! 2. **Sign** with [`Transaction::sign`].
//! 3. **Serialize** with [`Transaction::serialize`] and ship it.
//! 4. **Verify** on the other side with [`Transaction::validate`], or ask
//!    for the [`sender_address`](Transaction::sender_address) directly.
//!
//! ## Design Decisions
//!
//! - Fields are stored exactly as they go on the wire: minimal big-endian
//!   integers, no padding. Integer views are computed on demand.
//! - The chain id is resolved once, at construction, and never follows `v`
//!   afterwards.
//! - Sender caches are `OnceLock`s, so a `Transaction` is `Send + Sync` and
//!   a shared reference can verify concurrently.

pub mod builder;
pub mod codec;
pub mod error;
pub mod fees;
pub mod fields;
pub mod json;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{RawFields, Transaction, TxInput, TxOptions};
pub use error::TransactionError;
pub use fees::ValidationIssue;
pub use types::{Field, FieldSpec, ToFieldBytes, TxData};

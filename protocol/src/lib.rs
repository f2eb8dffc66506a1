// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ethtx: Legacy Ethereum Transaction Core
//!
//! A small, strict library for the transaction format Ethereum launched
//! with: nine RLP fields, secp256k1 signatures, and (since EIP-155) a chain
//! id folded into `v` so a signature cannot be replayed on another network.
//!
//! The format is simple; getting it *exactly* right is not. Which hash gets
//! signed depends on whether the transaction is signed yet, which hardfork
//! is active and what `v` looks like. Gas costs depend on the hardfork too.
//! This crate encodes those rules once, with tests pinned to published
//! vectors.
//!
//! ## Architecture
//!
//! - **chain**: which network and rule set apply (`ChainContext`, `Common`).
//! - **crypto**: Keccak-256, secp256k1 keys, recoverable ECDSA.
//! - **transaction**: canonical fields, wire codec, hashing, signing,
//!   verification, fees and validation.
//! - **config**: protocol constants.
//!
//! ## Quick start
//!
//! ```
//! use ethtx_protocol::chain::Chain;
//! use ethtx_protocol::crypto::EthKeypair;
//! use ethtx_protocol::transaction::{Transaction, TxData, TxOptions};
//!
//! let key = EthKeypair::from_hex(
//!     "0x4646464646464646464646464646464646464646464646464646464646464646",
//! )
//! .unwrap();
//! let data = TxData::new()
//!     .with_nonce(9u64)
//!     .with_gas_price(20_000_000_000u64)
//!     .with_gas_limit(21_000u64)
//!     .with_to([0x35u8; 20])
//!     .with_value(1_000_000_000_000_000_000u64);
//!
//! let mut tx = Transaction::from_data(data, TxOptions::new().with_chain(Chain::Mainnet)).unwrap();
//! tx.sign(&key).unwrap();
//!
//! assert_eq!(tx.v(), &[37]);
//! assert!(tx.validate());
//! assert_eq!(tx.sender_address().unwrap(), key.address());
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Bytes on the wire are the source of truth. Integers are views.
//! 2. No `unsafe`, no global mutable state.
//! 3. Verification answers `bool`; only the sender accessors return errors.
//! 4. If it touches signatures, it is tested against published vectors.

pub mod chain;
pub mod config;
pub mod crypto;
pub mod transaction;

pub use chain::{Chain, ChainContext, Common, Hardfork};
pub use crypto::EthKeypair;
pub use transaction::{Transaction, TransactionError, TxData, TxOptions};

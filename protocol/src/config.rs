//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction core depends on lives here. Most of
//! them are not ours to choose: they were fixed by the Ethereum yellow paper,
//! EIP-2 and EIP-155, and every client on the network agrees on them. Change
//! one and your signatures stop verifying everywhere else.

use crate::chain::{Chain, Hardfork};

// ---------------------------------------------------------------------------
// Raw Form
// ---------------------------------------------------------------------------

/// Number of fields in the legacy raw form:
/// `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`.
pub const TX_FIELD_COUNT: usize = 9;

/// Number of leading fields covered by a pre-EIP-155 signing hash.
pub const UNSIGNED_FIELD_COUNT: usize = 6;

/// Maximum width, in bytes, of the numeric fields (nonce, gas price, gas
/// limit, value, r, s). 256-bit words, like everything else in the EVM.
pub const WORD_LENGTH: usize = 32;

/// Width of an account address.
pub const ADDRESS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Default `v` for transactions built without a chain configuration.
/// `0x1c` = 28, the upper of the two pre-EIP-155 recovery values.
pub const LEGACY_DEFAULT_V: u8 = 0x1c;

/// Offset added to the raw recovery id in pre-EIP-155 signatures (`v ∈ {27, 28}`).
pub const LEGACY_V_OFFSET: u64 = 27;

/// EIP-155 base offset: `v = chain_id * 2 + 35 + recovery_id`.
pub const EIP155_V_OFFSET: u64 = 35;

/// What EIP-155 adds on top of an already legacy-encoded `v`
/// (`35 - 27`). Signing produces `27 + recid`, then adds `chain_id * 2 + 8`.
pub const EIP155_LEGACY_DELTA: u64 = EIP155_V_OFFSET - LEGACY_V_OFFSET;

/// `secp256k1n / 2`, big-endian. Signatures with `s` above this are rejected
/// from homestead on (EIP-2), which kills the `(r, n - s)` malleability twin.
pub const SECP256K1N_HALF: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// The secp256k1 group order `n`, big-endian.
pub const SECP256K1N: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

// ---------------------------------------------------------------------------
// Hardfork Gates
// ---------------------------------------------------------------------------

/// Low-s rule and the contract-creation surcharge both arrived with homestead.
pub const MALLEABILITY_HARDFORK: Hardfork = Hardfork::Homestead;

/// Contract creation costs `txCreation` on top of the base fee from here on.
pub const CREATION_FEE_HARDFORK: Hardfork = Hardfork::Homestead;

/// EIP-155 replay protection went live with spurious dragon.
pub const REPLAY_PROTECTION_HARDFORK: Hardfork = Hardfork::SpuriousDragon;

/// EIP-2028 cut the non-zero calldata price from 68 to 16.
pub const CALLDATA_REPRICE_HARDFORK: Hardfork = Hardfork::Istanbul;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Network assumed when no chain configuration is supplied.
pub const DEFAULT_CHAIN: Chain = Chain::Mainnet;

/// Rule set assumed when no hardfork is supplied.
pub const DEFAULT_HARDFORK: Hardfork = Hardfork::Petersburg;

// ---------------------------------------------------------------------------
// Gas Prices
// ---------------------------------------------------------------------------

/// Flat intrinsic cost of every transaction.
pub const GAS_TX: u64 = 21_000;

/// Surcharge for contract-creating transactions (homestead onwards).
pub const GAS_TX_CREATION: u64 = 32_000;

/// Per zero byte of calldata.
pub const GAS_TX_DATA_ZERO: u64 = 4;

/// Per non-zero byte of calldata, before istanbul.
pub const GAS_TX_DATA_NON_ZERO_FRONTIER: u64 = 68;

/// Per non-zero byte of calldata, istanbul onwards.
pub const GAS_TX_DATA_NON_ZERO_ISTANBUL: u64 = 16;

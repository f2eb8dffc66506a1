//! # CLI Interface
//!
//! Defines the command-line argument structure for `ethtx` using `clap`
//! derive. Four subcommands: `decode`, `sign`, `verify` and `params`.
//! Chain selection and log format are global, so they can go before or after
//! the subcommand.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ethtx_protocol::chain::{Chain, Hardfork};

use crate::logging::LogFormat;

/// Legacy Ethereum transaction tool.
///
/// Decodes, signs and verifies pre-EIP-2718 transactions, with or without
/// EIP-155 replay protection.
#[derive(Parser, Debug)]
#[command(
    name = "ethtx",
    about = "Decode, sign and verify legacy Ethereum transactions",
    version,
    propagate_version = true
)]
pub struct EthtxCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Well-known network, by name or chain id (`mainnet`, `3`, ...).
    ///
    /// Pins the chain id. When omitted, a decoded transaction's chain id is
    /// inferred from its `v`.
    #[arg(long, global = true, env = "ETHTX_CHAIN")]
    pub chain: Option<Chain>,

    /// Custom chain description (JSON with `name`, `chainId` and optional
    /// `gasPrices`).
    #[arg(long, global = true, env = "ETHTX_CHAIN_CONFIG", conflicts_with = "chain")]
    pub chain_config: Option<PathBuf>,

    /// Rule set to apply (`homestead`, `spuriousDragon`, `istanbul`, ...).
    ///
    /// Defaults to petersburg.
    #[arg(long, global = true, env = "ETHTX_HARDFORK")]
    pub hardfork: Option<Hardfork>,

    /// Log output format. Logs go to stderr; `RUST_LOG` sets the filter.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Top-level subcommands for the `ethtx` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a serialized transaction and print everything known about it.
    Decode(DecodeArgs),
    /// Build a transaction from JSON fields, sign it, print the wire form.
    Sign(SignArgs),
    /// Exit non-zero unless the transaction's signature verifies.
    Verify(VerifyArgs),
    /// Print the gas-price table of the selected chain and hardfork.
    Params,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// RLP-encoded transaction, hex, `0x` optional.
    pub tx: String,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Hex-encoded secp256k1 private key.
    ///
    /// **Prefer the environment variable**: command-line arguments end up in
    /// shell history and process listings.
    #[arg(long, env = "ETHTX_PRIVATE_KEY", hide_env_values = true)]
    pub key: String,

    /// Transaction fields as JSON, or `-` to read them from stdin.
    pub json: String,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// RLP-encoded transaction, hex, `0x` optional.
    pub tx: String,
}

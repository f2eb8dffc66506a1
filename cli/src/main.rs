// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ethtx
//!
//! Entry point for the `ethtx` binary. Parses CLI arguments, initializes
//! logging, and runs one of:
//!
//! - `decode`: decode a serialized transaction and report on it
//! - `sign`: build from JSON fields and sign
//! - `verify`: check a signature, exit non-zero if it does not verify
//! - `params`: print the gas-price table in force
//!
//! Results go to stdout, logs to stderr.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::io::Read;
use std::sync::Arc;

use ethtx_protocol::chain::common::GAS_PRICES_TOPIC;
use ethtx_protocol::chain::{ChainContext, ChainSpec, Common, GasPrice};
use ethtx_protocol::config::{DEFAULT_CHAIN, DEFAULT_HARDFORK};
use ethtx_protocol::crypto::EthKeypair;
use ethtx_protocol::transaction::{Transaction, TxData, TxOptions};

use cli::{Commands, EthtxCli, GlobalArgs};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "ethtx=info,ethtx_protocol=info";

fn main() -> Result<()> {
    let cli = EthtxCli::parse();
    logging::init_logging(DEFAULT_LOG_FILTER, cli.global.log_format);

    match cli.command {
        Commands::Decode(args) => decode(&cli.global, &args.tx),
        Commands::Sign(args) => sign(&cli.global, &args.key, &args.json),
        Commands::Verify(args) => verify(&cli.global, &args.tx),
        Commands::Params => params(&cli.global),
    }
}

/// Decodes a transaction and prints its fields, hashes, sender, fees and
/// validation report as JSON.
fn decode(global: &GlobalArgs, tx_hex: &str) -> Result<()> {
    let tx = parse_transaction(global, tx_hex)?;
    let sender = tx.sender_address().ok().map(|a| hex0x(a.as_bytes()));

    let report = json!({
        "fields": tx.to_json(true),
        "hash": hex0x(tx.hash(true).as_bytes()),
        "signingHash": hex0x(tx.hash(false).as_bytes()),
        "chainId": tx.chain_id(),
        "hardfork": tx.common().hardfork(),
        "eip155": tx.uses_eip155_signing_form(),
        "signed": tx.is_signed(),
        "creation": tx.to_creation_address(),
        "sender": sender,
        "dataFee": tx.data_fee().to_string(),
        "baseFee": tx.base_fee().to_string(),
        "upfrontCost": tx.upfront_cost().to_string(),
        "valid": tx.validate(),
        "issues": tx.validate_report(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Builds a transaction from JSON fields, signs it and prints the wire form.
fn sign(global: &GlobalArgs, key_hex: &str, json_arg: &str) -> Result<()> {
    let key = EthKeypair::from_hex(key_hex).context("invalid private key")?;

    let json = if json_arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read transaction JSON from stdin")?;
        buf
    } else {
        json_arg.to_string()
    };
    let data: TxData = serde_json::from_str(&json).context("invalid transaction JSON")?;

    let mut tx = Transaction::from_data(data, tx_options(global)?)?;
    tx.sign(&key)?;

    tracing::info!(
        hash = %hex0x(tx.hash(true).as_bytes()),
        chain_id = tx.chain_id(),
        from = %hex0x(key.address().as_bytes()),
        "transaction signed"
    );
    println!("{}", hex0x(&tx.serialize()));
    Ok(())
}

/// Prints the sender if the signature verifies, fails otherwise.
fn verify(global: &GlobalArgs, tx_hex: &str) -> Result<()> {
    let tx = parse_transaction(global, tx_hex)?;
    if !tx.verify_signature() {
        bail!("invalid signature");
    }
    let sender = tx.sender_address()?;
    println!("{}", hex0x(sender.as_bytes()));
    Ok(())
}

/// Prints the chain, hardfork and gas-price table in force.
fn params(global: &GlobalArgs) -> Result<()> {
    let common = common(global)?;
    let mut prices = serde_json::Map::new();
    for param in GasPrice::ALL {
        let value = common.param(GAS_PRICES_TOPIC, param.name())?;
        prices.insert(param.name().to_string(), Value::from(value));
    }

    let table = json!({
        "chain": common.chain_name(),
        "chainId": common.chain_id(),
        "hardfork": common.hardfork(),
        GAS_PRICES_TOPIC: prices,
    });
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The chain context named on the command line, defaults filled in.
fn common(global: &GlobalArgs) -> Result<Common> {
    let hardfork = global.hardfork.unwrap_or(DEFAULT_HARDFORK);
    match &global.chain_config {
        Some(path) => {
            let spec = ChainSpec::from_file(path)
                .with_context(|| format!("failed to load chain config {}", path.display()))?;
            Ok(Common::custom(spec, hardfork))
        }
        None => Ok(Common::new(global.chain.unwrap_or(DEFAULT_CHAIN), hardfork)),
    }
}

/// Transaction options from the global flags. Only a flag that names a
/// chain pins the chain id.
fn tx_options(global: &GlobalArgs) -> Result<TxOptions> {
    if global.chain_config.is_some() {
        let common: Arc<dyn ChainContext> = Arc::new(common(global)?);
        return Ok(TxOptions::new().with_common(common));
    }
    let mut options = TxOptions::new();
    if let Some(chain) = global.chain {
        options = options.with_chain(chain);
    }
    if let Some(hardfork) = global.hardfork {
        options = options.with_hardfork(hardfork);
    }
    Ok(options)
}

fn parse_transaction(global: &GlobalArgs, tx_hex: &str) -> Result<Transaction> {
    let trimmed = tx_hex.trim();
    let bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
        .context("transaction is not valid hex")?;
    let tx = Transaction::from_rlp(&bytes, tx_options(global)?)
        .context("failed to decode transaction")?;
    Ok(tx)
}

fn hex0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethtx_protocol::chain::{Chain, Hardfork};
    use ethtx_protocol::transaction::Field;
    use std::io::Write;

    fn args() -> GlobalArgs {
        GlobalArgs {
            chain: None,
            chain_config: None,
            hardfork: None,
            log_format: logging::LogFormat::Pretty,
        }
    }

    /// Unsigned-looking data whose `v` encodes chain 3.
    fn ropsten_v() -> TxData {
        TxData::new().set(Field::V, 41u64)
    }

    #[test]
    fn no_flags_mean_mainnet_petersburg() {
        let common = common(&args()).unwrap();
        assert_eq!(common.chain_id(), 1);
        assert_eq!(common.hardfork(), DEFAULT_HARDFORK);
    }

    #[test]
    fn chain_config_file_carries_the_hardfork() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "devnet", "chainId": 1337 }}"#).unwrap();
        let global = GlobalArgs {
            chain_config: Some(file.path().to_path_buf()),
            hardfork: Some(Hardfork::Istanbul),
            ..args()
        };

        let common = common(&global).unwrap();
        assert_eq!(common.chain_name(), "devnet");
        assert_eq!(common.chain_id(), 1337);
        assert_eq!(common.hardfork(), Hardfork::Istanbul);

        let tx = Transaction::from_data(ropsten_v(), tx_options(&global).unwrap()).unwrap();
        assert_eq!(tx.chain_id(), 1337);
        assert_eq!(tx.common().hardfork(), Hardfork::Istanbul);
    }

    #[test]
    fn missing_chain_config_names_the_file() {
        let global = GlobalArgs {
            chain_config: Some("does-not-exist.json".into()),
            ..args()
        };
        let err = tx_options(&global).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.json"));
    }

    #[test]
    fn hardfork_alone_does_not_pin_the_chain() {
        let global = GlobalArgs {
            hardfork: Some(Hardfork::SpuriousDragon),
            ..args()
        };
        let tx = Transaction::from_data(ropsten_v(), tx_options(&global).unwrap()).unwrap();
        assert_eq!(tx.chain_id(), 3);
        assert_eq!(tx.common().hardfork(), Hardfork::SpuriousDragon);

        let pinned = GlobalArgs {
            chain: Some(Chain::Mainnet),
            ..global
        };
        let tx = Transaction::from_data(ropsten_v(), tx_options(&pinned).unwrap()).unwrap();
        assert_eq!(tx.chain_id(), 1);
    }

    #[test]
    fn transaction_hex_accepts_prefix_and_whitespace() {
        let bare = parse_transaction(&args(), "c0").unwrap();
        let prefixed = parse_transaction(&args(), " 0xc0\n").unwrap();
        assert_eq!(bare, prefixed);
        assert!(parse_transaction(&args(), "0xzz").is_err());
    }
}

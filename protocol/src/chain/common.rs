//! The default [`ChainContext`]: a chain description plus an active hardfork.
//!
//! Built-in networks come from [`Chain`]. Anything else is described by a
//! small JSON document:
//!
//! ```json
//! { "name": "devnet", "chainId": 1337, "gasPrices": { "txDataNonZero": 16 } }
//! ```
//!
//! `gasPrices` is optional and overrides the hardfork schedule by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use super::{Chain, ChainContext, GasPrice, Hardfork};
use crate::config::{
    CALLDATA_REPRICE_HARDFORK, DEFAULT_CHAIN, DEFAULT_HARDFORK, GAS_TX, GAS_TX_CREATION,
    GAS_TX_DATA_NON_ZERO_FRONTIER, GAS_TX_DATA_NON_ZERO_ISTANBUL, GAS_TX_DATA_ZERO,
};

/// Parameter topic holding the gas prices.
pub const GAS_PRICES_TOPIC: &str = "gasPrices";

/// Errors raised while selecting or loading a chain configuration.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    #[error("unknown hardfork: {0}")]
    UnknownHardfork(String),

    #[error("unknown parameter {topic}.{name}")]
    UnknownParam { topic: String, name: String },

    #[error("invalid chain spec: {0}")]
    InvalidSpec(#[from] serde_json::Error),

    #[error("failed to read chain spec: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// ChainSpec
// ---------------------------------------------------------------------------

/// Static description of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChainSpec {
    /// Human-readable network name.
    pub name: String,
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Per-name overrides of the hardfork gas schedule.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub gas_prices: BTreeMap<String, u64>,
}

impl ChainSpec {
    /// Spec of a built-in network.
    pub fn builtin(chain: Chain) -> Self {
        Self {
            name: chain.name().to_string(),
            chain_id: chain.chain_id(),
            gas_prices: BTreeMap::new(),
        }
    }

    /// Parses a custom chain description. Unknown gas-price names are
    /// rejected here rather than silently ignored at fee time.
    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        let spec: Self = serde_json::from_str(json)?;
        if let Some(name) = spec
            .gas_prices
            .keys()
            .find(|name| GasPrice::from_name(name).is_none())
        {
            return Err(ChainError::UnknownParam {
                topic: GAS_PRICES_TOPIC.to_string(),
                name: name.clone(),
            });
        }
        Ok(spec)
    }

    /// Reads and parses a custom chain description from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

// ---------------------------------------------------------------------------
// Common
// ---------------------------------------------------------------------------

/// A chain description with an active hardfork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Common {
    spec: ChainSpec,
    hardfork: Hardfork,
}

impl Common {
    /// A built-in network under the given rule set.
    pub fn new(chain: Chain, hardfork: Hardfork) -> Self {
        Self::custom(ChainSpec::builtin(chain), hardfork)
    }

    /// A custom network under the given rule set.
    pub fn custom(spec: ChainSpec, hardfork: Hardfork) -> Self {
        Self { spec, hardfork }
    }

    /// Same network, different rule set.
    pub fn with_hardfork(mut self, hardfork: Hardfork) -> Self {
        self.hardfork = hardfork;
        self
    }

    pub fn chain_name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ChainSpec {
        &self.spec
    }

    /// Name-based parameter lookup, e.g. `param("gasPrices", "txCreation")`.
    pub fn param(&self, topic: &str, name: &str) -> Result<u64, ChainError> {
        let unknown = || ChainError::UnknownParam {
            topic: topic.to_string(),
            name: name.to_string(),
        };
        if topic != GAS_PRICES_TOPIC {
            return Err(unknown());
        }
        GasPrice::from_name(name)
            .map(|p| self.gas_price(p))
            .ok_or_else(unknown)
    }
}

impl Default for Common {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN, DEFAULT_HARDFORK)
    }
}

impl ChainContext for Common {
    fn chain_id(&self) -> u64 {
        self.spec.chain_id
    }

    fn hardfork(&self) -> Hardfork {
        self.hardfork
    }

    fn gas_price(&self, param: GasPrice) -> u64 {
        self.spec
            .gas_prices
            .get(param.name())
            .copied()
            .unwrap_or_else(|| scheduled_gas_price(self.hardfork, param))
    }
}

/// Gas price of `param` under the stock schedule of `hardfork`.
pub fn scheduled_gas_price(hardfork: Hardfork, param: GasPrice) -> u64 {
    match param {
        GasPrice::Tx => GAS_TX,
        GasPrice::TxCreation => GAS_TX_CREATION,
        GasPrice::TxDataZero => GAS_TX_DATA_ZERO,
        GasPrice::TxDataNonZero if hardfork >= CALLDATA_REPRICE_HARDFORK => {
            GAS_TX_DATA_NON_ZERO_ISTANBUL
        }
        GasPrice::TxDataNonZero => GAS_TX_DATA_NON_ZERO_FRONTIER,
    }
}

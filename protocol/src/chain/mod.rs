//! # Chain Context
//!
//! The transaction core never decides on its own which network it is on or
//! which rule set applies. It asks a [`ChainContext`]: what is the chain id,
//! are we at or past hardfork X, and what does gas parameter Y cost here.
//!
//! [`Common`] is the implementation everybody uses: the well-known public
//! networks, the legacy hardfork ladder, and the matching gas schedule.
//! Custom chains (devnets, private networks) load from JSON via
//! [`ChainSpec::from_json`].

pub mod common;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use common::{ChainError, ChainSpec, Common};

// ---------------------------------------------------------------------------
// Hardfork
// ---------------------------------------------------------------------------

/// Protocol rule checkpoints, in activation order.
///
/// The derived `Ord` is the activation order, so "at or after" is a plain
/// `>=`. Only the forks that change legacy transaction rules or fees matter
/// here, but the full ladder up to istanbul is listed so configuration names
/// round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Hardfork {
    Chainstart,
    Homestead,
    Dao,
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
}

impl Hardfork {
    /// Every hardfork, oldest first.
    pub const ALL: [Hardfork; 9] = [
        Hardfork::Chainstart,
        Hardfork::Homestead,
        Hardfork::Dao,
        Hardfork::TangerineWhistle,
        Hardfork::SpuriousDragon,
        Hardfork::Byzantium,
        Hardfork::Constantinople,
        Hardfork::Petersburg,
        Hardfork::Istanbul,
    ];

    /// Canonical configuration name (`"spuriousDragon"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Chainstart => "chainstart",
            Self::Homestead => "homestead",
            Self::Dao => "dao",
            Self::TangerineWhistle => "tangerineWhistle",
            Self::SpuriousDragon => "spuriousDragon",
            Self::Byzantium => "byzantium",
            Self::Constantinople => "constantinople",
            Self::Petersburg => "petersburg",
            Self::Istanbul => "istanbul",
        }
    }
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hardfork {
    type Err = ChainError;

    /// Case-insensitive, so `spuriousdragon` from a shell works too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|hf| hf.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ChainError::UnknownHardfork(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Well-known public networks with a fixed chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Mainnet,
    Ropsten,
    Rinkeby,
    Goerli,
    Kovan,
}

impl Chain {
    pub const ALL: [Chain; 5] = [
        Chain::Mainnet,
        Chain::Ropsten,
        Chain::Rinkeby,
        Chain::Goerli,
        Chain::Kovan,
    ];

    /// EIP-155 chain id.
    pub fn chain_id(self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Ropsten => 3,
            Self::Rinkeby => 4,
            Self::Goerli => 5,
            Self::Kovan => 42,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Ropsten => "ropsten",
            Self::Rinkeby => "rinkeby",
            Self::Goerli => "goerli",
            Self::Kovan => "kovan",
        }
    }

    /// Looks a network up by its chain id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.chain_id() == chain_id)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chain {
    type Err = ChainError;

    /// Accepts a network name or its decimal chain id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u64>() {
            return Self::from_chain_id(id).ok_or_else(|| ChainError::UnknownChain(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ChainError::UnknownChain(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// GasPrice
// ---------------------------------------------------------------------------

/// Named entries of the `gasPrices` parameter table that transaction fees use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GasPrice {
    /// Flat per-transaction cost.
    Tx,
    /// Contract creation surcharge.
    TxCreation,
    /// Per zero byte of calldata.
    TxDataZero,
    /// Per non-zero byte of calldata.
    TxDataNonZero,
}

impl GasPrice {
    pub const ALL: [GasPrice; 4] = [
        GasPrice::Tx,
        GasPrice::TxCreation,
        GasPrice::TxDataZero,
        GasPrice::TxDataNonZero,
    ];

    /// Parameter name inside the `gasPrices` topic.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tx => "tx",
            Self::TxCreation => "txCreation",
            Self::TxDataZero => "txDataZero",
            Self::TxDataNonZero => "txDataNonZero",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

// ---------------------------------------------------------------------------
// ChainContext
// ---------------------------------------------------------------------------

/// What a transaction needs to know about the network it lives on.
///
/// Implementations must be pure: the same question always gets the same
/// answer for the lifetime of the context. Transactions share a context via
/// `Arc<dyn ChainContext>`, so it also has to be `Send + Sync`.
pub trait ChainContext: fmt::Debug + Send + Sync {
    /// EIP-155 chain id.
    fn chain_id(&self) -> u64;

    /// The rule set in force.
    fn hardfork(&self) -> Hardfork;

    /// `true` if the active rule set is `hardfork` or a later one.
    fn gte_hardfork(&self, hardfork: Hardfork) -> bool {
        self.hardfork() >= hardfork
    }

    /// Value of a gas-price parameter under the active rule set.
    fn gas_price(&self, param: GasPrice) -> u64;
}

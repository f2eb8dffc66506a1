//! Transaction construction.
//!
//! A [`Transaction`] is built once, from one of three input shapes
//! ([`TxInput`]), under a chain context chosen by [`TxOptions`]. After that
//! the only thing that ever changes its fields is
//! [`sign`](Transaction::sign).
//!
//! Every input value passes through the same canonicalizer, so a
//! transaction decoded from the wire and one assembled from JSON are held
//! in exactly the same form.

use ethereum_types::{Address, U256};
use std::sync::{Arc, OnceLock};
use tracing::debug;

use super::codec;
use super::error::TransactionError;
use super::fields::{canonicalize, minimal_u64, to_u256};
use super::types::{Field, TxData};
use crate::chain::{Chain, ChainContext, Common, Hardfork};
use crate::config::{
    DEFAULT_CHAIN, DEFAULT_HARDFORK, EIP155_V_OFFSET, LEGACY_DEFAULT_V, TX_FIELD_COUNT,
};
use crate::crypto::PublicKey;

/// The nine canonical fields, in wire order.
pub type RawFields = [Vec<u8>; TX_FIELD_COUNT];

// ---------------------------------------------------------------------------
// Input & options
// ---------------------------------------------------------------------------

/// The three shapes a transaction can be built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxInput {
    /// The RLP wire form.
    Rlp(Vec<u8>),
    /// An ordered list of field values. Up to nine; missing trailing fields
    /// take their defaults.
    Fields(Vec<Vec<u8>>),
    /// Named fields plus an optional fallback chain id.
    Data(TxData),
}

impl From<TxData> for TxInput {
    fn from(data: TxData) -> Self {
        Self::Data(data)
    }
}

impl From<Vec<Vec<u8>>> for TxInput {
    fn from(fields: Vec<Vec<u8>>) -> Self {
        Self::Fields(fields)
    }
}

/// Which network and rule set a transaction lives under.
///
/// Either name a chain and/or hardfork, or hand over a ready-made context.
/// Not both. With nothing set, the context is mainnet at petersburg but the
/// chain id is taken from the transaction's own `v`.
#[derive(Debug, Clone, Default)]
pub struct TxOptions {
    pub chain: Option<Chain>,
    pub hardfork: Option<Hardfork>,
    pub common: Option<Arc<dyn ChainContext>>,
}

impl TxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, chain: Chain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn with_hardfork(mut self, hardfork: Hardfork) -> Self {
        self.hardfork = Some(hardfork);
        self
    }

    pub fn with_common(mut self, common: Arc<dyn ChainContext>) -> Self {
        self.common = Some(common);
        self
    }

    /// The context to use, and whether the caller pinned the chain.
    fn resolve(self) -> Result<(Arc<dyn ChainContext>, bool), TransactionError> {
        match self.common {
            Some(_) if self.chain.is_some() || self.hardfork.is_some() => {
                Err(TransactionError::ConfigurationConflict)
            }
            Some(common) => Ok((common, true)),
            None => {
                let common = Common::new(
                    self.chain.unwrap_or(DEFAULT_CHAIN),
                    self.hardfork.unwrap_or(DEFAULT_HARDFORK),
                );
                Ok((Arc::new(common), self.chain.is_some()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A legacy (pre-EIP-2718) Ethereum transaction.
///
/// Holds the nine canonical fields, the chain context they are interpreted
/// under, the chain id resolved at construction, and two lazily filled
/// caches (sender public key and address) that [`sign`](Self::sign)
/// invalidates.
///
/// # Example
///
/// ```
/// use ethtx_protocol::chain::Chain;
/// use ethtx_protocol::crypto::EthKeypair;
/// use ethtx_protocol::transaction::{Transaction, TxData, TxOptions};
///
/// let key = EthKeypair::generate();
/// let data = TxData::new()
///     .with_nonce(0u64)
///     .with_gas_price(20_000_000_000u64)
///     .with_gas_limit(21_000u64)
///     .with_to([0x35u8; 20]);
///
/// let mut tx = Transaction::from_data(data, TxOptions::new().with_chain(Chain::Mainnet)).unwrap();
/// tx.sign(&key).unwrap();
///
/// assert!(tx.verify_signature());
/// assert_eq!(tx.sender_address().unwrap(), key.address());
/// ```
#[derive(Debug, Clone)]
pub struct Transaction {
    pub(super) raw: RawFields,
    pub(super) common: Arc<dyn ChainContext>,
    pub(super) chain_id: u64,
    pub(super) sender_public_key: OnceLock<PublicKey>,
    pub(super) sender_address: OnceLock<Address>,
}

impl Transaction {
    /// Builds a transaction from any input shape.
    pub fn new(input: impl Into<TxInput>, options: TxOptions) -> Result<Self, TransactionError> {
        let (common, chain_pinned) = options.resolve()?;

        let mut raw = RawFields::default();
        raw[Field::V.index()] = if chain_pinned {
            minimal_u64(common.chain_id())
        } else {
            vec![LEGACY_DEFAULT_V]
        };

        let mut fallback_chain_id = None;
        match input.into() {
            TxInput::Rlp(bytes) => apply_list(&mut raw, codec::decode_list(&bytes)?)?,
            TxInput::Fields(values) => apply_list(&mut raw, values)?,
            TxInput::Data(data) => {
                for field in Field::ALL {
                    if let Some(value) = data.get(field) {
                        raw[field.index()] = canonicalize(field, value)?;
                    }
                }
                fallback_chain_id = data.chain_id;
            }
        }

        let chain_id = if chain_pinned {
            common.chain_id()
        } else {
            match chain_id_from_v(&raw[Field::V.index()])? {
                0 => fallback_chain_id.unwrap_or(0),
                derived => derived,
            }
        };

        let tx = Self {
            raw,
            common,
            chain_id,
            sender_public_key: OnceLock::new(),
            sender_address: OnceLock::new(),
        };
        debug!(
            chain_id,
            hardfork = %tx.common.hardfork(),
            signed = tx.is_signed(),
            creation = tx.to_creation_address(),
            "transaction constructed"
        );
        Ok(tx)
    }

    /// Decodes the RLP wire form.
    pub fn from_rlp(bytes: &[u8], options: TxOptions) -> Result<Self, TransactionError> {
        Self::new(TxInput::Rlp(bytes.to_vec()), options)
    }

    /// Builds from an ordered list of field values.
    pub fn from_fields(fields: Vec<Vec<u8>>, options: TxOptions) -> Result<Self, TransactionError> {
        Self::new(TxInput::Fields(fields), options)
    }

    /// Builds from named fields.
    pub fn from_data(data: TxData, options: TxOptions) -> Result<Self, TransactionError> {
        Self::new(TxInput::Data(data), options)
    }

    // -- accessors ----------------------------------------------------------

    /// All nine fields, in wire order.
    pub fn raw(&self) -> &RawFields {
        &self.raw
    }

    pub fn field(&self, field: Field) -> &[u8] {
        &self.raw[field.index()]
    }

    pub fn nonce(&self) -> &[u8] {
        self.field(Field::Nonce)
    }

    pub fn gas_price(&self) -> &[u8] {
        self.field(Field::GasPrice)
    }

    pub fn gas_limit(&self) -> &[u8] {
        self.field(Field::GasLimit)
    }

    pub fn to(&self) -> &[u8] {
        self.field(Field::To)
    }

    pub fn value(&self) -> &[u8] {
        self.field(Field::Value)
    }

    pub fn data(&self) -> &[u8] {
        self.field(Field::Data)
    }

    pub fn v(&self) -> &[u8] {
        self.field(Field::V)
    }

    pub fn r(&self) -> &[u8] {
        self.field(Field::R)
    }

    pub fn s(&self) -> &[u8] {
        self.field(Field::S)
    }

    /// Recipient, or `None` for contract creation.
    pub fn to_address(&self) -> Option<Address> {
        let to = self.to();
        (!to.is_empty()).then(|| Address::from_slice(to))
    }

    /// `true` if this transaction deploys a contract (empty `to`).
    pub fn to_creation_address(&self) -> bool {
        self.to().is_empty()
    }

    /// `true` unless both `r` and `s` are empty.
    pub fn is_signed(&self) -> bool {
        !(self.r().is_empty() && self.s().is_empty())
    }

    /// Chain id resolved at construction. Signing never changes it.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The chain context this transaction is interpreted under.
    pub fn common(&self) -> &Arc<dyn ChainContext> {
        &self.common
    }

    /// RLP wire form of all nine fields.
    pub fn serialize(&self) -> Vec<u8> {
        codec::encode_list(&self.raw)
    }
}

impl PartialEq for Transaction {
    /// Same fields and same chain id. Contexts and caches are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.chain_id == other.chain_id
    }
}

impl Eq for Transaction {}

impl TryFrom<&[u8]> for Transaction {
    type Error = TransactionError;

    /// Decodes the wire form under default options.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_rlp(bytes, TxOptions::default())
    }
}

/// Chain id encoded in an EIP-155 `v`: `(v - 35) / 2`, or 0 below 35.
pub(super) fn chain_id_from_v(v: &[u8]) -> Result<u64, TransactionError> {
    let v = to_u256(v).ok_or(TransactionError::ChainIdOutOfRange)?;
    let offset = U256::from(EIP155_V_OFFSET);
    if v < offset {
        return Ok(0);
    }
    let chain_id = (v - offset) / U256::from(2u64);
    if chain_id > U256::from(u64::MAX) {
        return Err(TransactionError::ChainIdOutOfRange);
    }
    Ok(chain_id.as_u64())
}

fn apply_list(raw: &mut RawFields, values: Vec<Vec<u8>>) -> Result<(), TransactionError> {
    if values.len() > TX_FIELD_COUNT {
        return Err(TransactionError::FieldCount {
            max: TX_FIELD_COUNT,
            actual: values.len(),
        });
    }
    for (field, value) in Field::ALL.into_iter().zip(values) {
        raw[field.index()] = canonicalize(field, &value)?;
    }
    Ok(())
}

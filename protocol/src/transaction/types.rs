//! Core type definitions for legacy transactions.
//!
//! A legacy transaction is nine byte strings in a fixed order. These types
//! name the nine, carry their length rules, and describe the structured
//! input ([`TxData`]) a transaction can be built from.

use ethereum_types::{Address, U256};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt;

use super::fields::{minimal_u256, minimal_u64};
use crate::config::{ADDRESS_LENGTH, WORD_LENGTH};

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// The nine fields of a legacy transaction, in wire order.
///
/// The order is part of the wire contract. `Field as usize` is the index in
/// the raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Nonce,
    GasPrice,
    GasLimit,
    To,
    Value,
    Data,
    V,
    R,
    S,
}

impl Field {
    /// All fields, in wire order.
    pub const ALL: [Field; 9] = [
        Field::Nonce,
        Field::GasPrice,
        Field::GasLimit,
        Field::To,
        Field::Value,
        Field::Data,
        Field::V,
        Field::R,
        Field::S,
    ];

    /// Position in the raw form.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical JSON name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nonce => "nonce",
            Self::GasPrice => "gasPrice",
            Self::GasLimit => "gasLimit",
            Self::To => "to",
            Self::Value => "value",
            Self::Data => "data",
            Self::V => "v",
            Self::R => "r",
            Self::S => "s",
        }
    }

    /// Alternative input name, if the field has one.
    pub fn alias(self) -> Option<&'static str> {
        match self {
            Self::GasLimit => Some("gas"),
            Self::Data => Some("input"),
            _ => None,
        }
    }

    /// Looks a field up by canonical name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name || f.alias() == Some(name))
    }

    /// Length rules of this field.
    pub fn spec(self) -> FieldSpec {
        match self {
            Self::Nonce | Self::GasPrice | Self::GasLimit | Self::Value => FieldSpec {
                length: Some(WORD_LENGTH),
                allow_less: true,
                allow_zero: false,
            },
            Self::To => FieldSpec {
                length: Some(ADDRESS_LENGTH),
                allow_less: false,
                allow_zero: true,
            },
            Self::Data | Self::V => FieldSpec {
                length: None,
                allow_less: false,
                allow_zero: true,
            },
            Self::R | Self::S => FieldSpec {
                length: Some(WORD_LENGTH),
                allow_less: true,
                allow_zero: true,
            },
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Length rules for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Maximum (with `allow_less`) or exact width in bytes. `None` means
    /// unbounded.
    pub length: Option<usize>,
    /// Leading zero bytes are stripped and shorter values are fine.
    pub allow_less: bool,
    /// The empty string is a meaningful value, and a lone `0x00` is kept.
    pub allow_zero: bool,
}

// ---------------------------------------------------------------------------
// ToFieldBytes
// ---------------------------------------------------------------------------

/// Anything that can be turned into a field value.
///
/// Integers become their minimal big-endian encoding (zero is the empty
/// string). Byte strings are taken as-is and canonicalized later.
pub trait ToFieldBytes {
    fn to_field_bytes(&self) -> Vec<u8>;
}

impl ToFieldBytes for u64 {
    fn to_field_bytes(&self) -> Vec<u8> {
        minimal_u64(*self)
    }
}

impl ToFieldBytes for U256 {
    fn to_field_bytes(&self) -> Vec<u8> {
        minimal_u256(*self)
    }
}

impl ToFieldBytes for Address {
    fn to_field_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl ToFieldBytes for [u8] {
    fn to_field_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<const N: usize> ToFieldBytes for [u8; N] {
    fn to_field_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl ToFieldBytes for Vec<u8> {
    fn to_field_bytes(&self) -> Vec<u8> {
        self.clone()
    }
}

impl<T: ToFieldBytes + ?Sized> ToFieldBytes for &T {
    fn to_field_bytes(&self) -> Vec<u8> {
        (**self).to_field_bytes()
    }
}

// ---------------------------------------------------------------------------
// TxData
// ---------------------------------------------------------------------------

/// Structured transaction input: named fields, all optional.
///
/// Missing fields take their defaults at construction. Deserializes from the
/// usual JSON shape, where every value is a `0x`-hex string or an integer:
///
/// ```
/// use ethtx_protocol::transaction::TxData;
///
/// let data: TxData = serde_json::from_str(
///     r#"{ "nonce": "0x09", "gas": 21000, "to": "0x3535353535353535353535353535353535353535" }"#,
/// )
/// .unwrap();
/// assert_eq!(data.nonce, Some(vec![0x09]));
/// assert_eq!(data.gas_limit, Some(vec![0x52, 0x08]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    #[serde(default, deserialize_with = "deserialize_field")]
    pub nonce: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub gas_price: Option<Vec<u8>>,
    #[serde(default, alias = "gas", deserialize_with = "deserialize_field")]
    pub gas_limit: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub to: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub value: Option<Vec<u8>>,
    #[serde(default, alias = "input", deserialize_with = "deserialize_field")]
    pub data: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub v: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub r: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_field")]
    pub s: Option<Vec<u8>>,
    /// Fallback chain id, used only when neither the options nor `v` say
    /// otherwise.
    #[serde(default, deserialize_with = "deserialize_chain_id")]
    pub chain_id: Option<u64>,
}

impl TxData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value supplied for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&[u8]> {
        let slot = match field {
            Field::Nonce => &self.nonce,
            Field::GasPrice => &self.gas_price,
            Field::GasLimit => &self.gas_limit,
            Field::To => &self.to,
            Field::Value => &self.value,
            Field::Data => &self.data,
            Field::V => &self.v,
            Field::R => &self.r,
            Field::S => &self.s,
        };
        slot.as_deref()
    }

    /// Sets any field by name.
    pub fn set(mut self, field: Field, value: impl ToFieldBytes) -> Self {
        let bytes = Some(value.to_field_bytes());
        match field {
            Field::Nonce => self.nonce = bytes,
            Field::GasPrice => self.gas_price = bytes,
            Field::GasLimit => self.gas_limit = bytes,
            Field::To => self.to = bytes,
            Field::Value => self.value = bytes,
            Field::Data => self.data = bytes,
            Field::V => self.v = bytes,
            Field::R => self.r = bytes,
            Field::S => self.s = bytes,
        }
        self
    }

    pub fn with_nonce(self, value: impl ToFieldBytes) -> Self {
        self.set(Field::Nonce, value)
    }

    pub fn with_gas_price(self, value: impl ToFieldBytes) -> Self {
        self.set(Field::GasPrice, value)
    }

    pub fn with_gas_limit(self, value: impl ToFieldBytes) -> Self {
        self.set(Field::GasLimit, value)
    }

    pub fn with_to(self, value: impl ToFieldBytes) -> Self {
        self.set(Field::To, value)
    }

    pub fn with_value(self, value: impl ToFieldBytes) -> Self {
        self.set(Field::Value, value)
    }

    pub fn with_data(self, value: impl ToFieldBytes) -> Self {
        self.set(Field::Data, value)
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }
}

/// JSON spelling of a field value.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonQuantity {
    Int(u64),
    Hex(String),
}

impl JsonQuantity {
    fn into_bytes(self) -> Result<Vec<u8>, String> {
        match self {
            Self::Int(n) => Ok(minimal_u64(n)),
            Self::Hex(s) => {
                let digits = s.strip_prefix("0x").unwrap_or(&s);
                // Odd-length hex gets a leading zero nibble.
                let padded = if digits.len() % 2 == 1 {
                    format!("0{digits}")
                } else {
                    digits.to_string()
                };
                hex::decode(&padded).map_err(|e| format!("invalid hex string {s:?}: {e}"))
            }
        }
    }
}

fn deserialize_field<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<JsonQuantity>::deserialize(deserializer)?
        .map(|q| q.into_bytes().map_err(D::Error::custom))
        .transpose()
}

fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(bytes) = deserialize_field(deserializer)? else {
        return Ok(None);
    };
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let bytes = &bytes[first..];
    if bytes.len() > 8 {
        return Err(D::Error::custom("chainId does not fit in 64 bits"));
    }
    Ok(Some(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))))
}

//! Field canonicalization and the integer ↔ byte-string conversions around it.
//!
//! Every value that enters a transaction, whatever the input shape, goes
//! through [`canonicalize`]. Values are stored minimal and never padded on
//! write; padding, if anyone wants it, is a presentation concern.

use ethereum_types::U256;

use super::error::TransactionError;
use super::types::Field;
use crate::config::WORD_LENGTH;

/// Applies the length rules of `field` to `value`.
///
/// 1. A lone `0x00` on a field that does not allow zero becomes empty.
/// 2. With `allow_less`, leading zeros are stripped and the rest must fit in
///    `length` bytes.
/// 3. Otherwise a bounded field must be exactly `length` bytes, unless it is
///    an `allow_zero` field holding the empty string.
pub fn canonicalize(field: Field, value: &[u8]) -> Result<Vec<u8>, TransactionError> {
    let spec = field.spec();

    if value == [0u8] && !spec.allow_zero {
        return Ok(Vec::new());
    }

    let Some(length) = spec.length else {
        return Ok(value.to_vec());
    };

    if spec.allow_less {
        let stripped = strip_leading_zeros(value);
        if stripped.len() > length {
            return Err(TransactionError::FieldLength {
                field,
                max: length,
                actual: stripped.len(),
            });
        }
        return Ok(stripped.to_vec());
    }

    if !(spec.allow_zero && value.is_empty()) && value.len() != length {
        return Err(TransactionError::FieldWidth {
            field,
            expected: length,
            actual: value.len(),
        });
    }
    Ok(value.to_vec())
}

/// `value` without its leading zero bytes.
pub fn strip_leading_zeros(value: &[u8]) -> &[u8] {
    let first = value.iter().position(|b| *b != 0).unwrap_or(value.len());
    &value[first..]
}

/// Big-endian unsigned integer value of a byte string, or `None` if it is
/// wider than 256 bits.
pub fn to_u256(value: &[u8]) -> Option<U256> {
    let stripped = strip_leading_zeros(value);
    (stripped.len() <= WORD_LENGTH).then(|| U256::from_big_endian(stripped))
}

/// Minimal big-endian encoding; zero is the empty string.
pub fn minimal_u256(value: U256) -> Vec<u8> {
    let mut word = [0u8; WORD_LENGTH];
    value.to_big_endian(&mut word);
    strip_leading_zeros(&word).to_vec()
}

/// Minimal big-endian encoding; zero is the empty string.
pub fn minimal_u64(value: u64) -> Vec<u8> {
    strip_leading_zeros(&value.to_be_bytes()).to_vec()
}

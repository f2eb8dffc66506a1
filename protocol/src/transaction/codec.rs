//! RLP wire form of a legacy transaction: a flat list of byte strings.
//!
//! Only the shape a legacy transaction can take is accepted on decode. One
//! list, no nested lists, no trailing garbage after it.

use rlp::{DecoderError, Rlp, RlpStream};

/// Encodes an ordered list of byte strings.
pub fn encode_list<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(items.len());
    for item in items {
        stream.append(&item.as_ref().to_vec());
    }
    stream.out().to_vec()
}

/// Decodes a flat list of byte strings.
pub fn decode_list(bytes: &[u8]) -> Result<Vec<Vec<u8>>, DecoderError> {
    let rlp = Rlp::new(bytes);
    let info = rlp.payload_info()?;
    if info.total() != bytes.len() {
        return Err(DecoderError::RlpInconsistentLengthAndData);
    }
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList);
    }

    let mut items = Vec::with_capacity(rlp.item_count()?);
    for item in rlp.iter() {
        if !item.is_data() {
            return Err(DecoderError::RlpExpectedToBeData);
        }
        items.push(item.data()?.to_vec());
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_encode_as_0x80() {
        let empty: &[u8] = &[];
        assert_eq!(encode_list(&[empty, empty]), vec![0xc2, 0x80, 0x80]);
    }

    #[test]
    fn single_low_byte_is_its_own_encoding() {
        assert_eq!(encode_list(&[[0x7fu8]]), vec![0xc1, 0x7f]);
        assert_eq!(encode_list(&[[0x80u8]]), vec![0xc2, 0x81, 0x80]);
    }

    #[test]
    fn decode_reverses_encode() {
        let items = vec![vec![], vec![0x09], vec![0xab; 20], vec![0u8; 60]];
        let encoded = encode_list(&items);
        // 60-byte payload pushes the list header into the long form.
        assert_eq!(encoded[0], 0xf8);
        assert_eq!(decode_list(&encoded).unwrap(), items);
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut encoded = encode_list(&[[1u8]]);
        encoded.push(0x00);
        assert_eq!(
            decode_list(&encoded),
            Err(DecoderError::RlpInconsistentLengthAndData)
        );
    }

    #[test]
    fn rejects_non_list_and_nested_lists() {
        assert_eq!(decode_list(&[0x83, 1, 2, 3]), Err(DecoderError::RlpExpectedToBeList));
        // [[]]
        assert_eq!(decode_list(&[0xc1, 0xc0]), Err(DecoderError::RlpExpectedToBeData));
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(decode_list(&[]).is_err());
        assert!(decode_list(&[0xc3, 0x80]).is_err());
    }
}

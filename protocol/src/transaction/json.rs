//! JSON view of a transaction: every field as a `0x`-hex string.

use serde_json::{Map, Value};

use super::builder::Transaction;
use super::types::Field;

impl Transaction {
    /// With `labels`, an object keyed by field name; without, an array in
    /// wire order. Empty fields render as `"0x"`.
    ///
    /// ```
    /// use ethtx_protocol::transaction::{Transaction, TxData, TxOptions};
    ///
    /// let tx = Transaction::from_data(TxData::new().with_nonce(9u64), TxOptions::default()).unwrap();
    /// assert_eq!(tx.to_json(true)["nonce"], "0x09");
    /// assert_eq!(tx.to_json(false)[6], "0x1c");
    /// ```
    pub fn to_json(&self, labels: bool) -> Value {
        if labels {
            let object: Map<String, Value> = Field::ALL
                .into_iter()
                .map(|f| (f.name().to_string(), Value::String(prefixed_hex(self.field(f)))))
                .collect();
            Value::Object(object)
        } else {
            Value::Array(
                self.raw
                    .iter()
                    .map(|bytes| Value::String(prefixed_hex(bytes)))
                    .collect(),
            )
        }
    }
}

fn prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

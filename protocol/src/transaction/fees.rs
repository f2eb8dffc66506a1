//! Intrinsic gas, upfront cost and validity.
//!
//! All gas prices come from the transaction's chain context, so the same
//! bytes can cost different amounts under different hardforks (calldata got
//! 4x cheaper at istanbul, contract creation got a surcharge at homestead).
//!
//! Arithmetic is exact. Numeric fields are at most one word, so
//! `gasLimit * gasPrice + value` always fits in 512 bits.

use ethereum_types::{U256, U512};
use std::fmt;

use super::builder::Transaction;
use super::fields::to_u256;
use super::types::Field;
use crate::chain::GasPrice;
use crate::config::CREATION_FEE_HARDFORK;

/// One reason a transaction is not valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The signature does not recover to a sender.
    InvalidSignature,
    /// `gasLimit` does not even cover the intrinsic gas.
    GasLimitTooLow { required: U256 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature => f.write_str("Invalid Signature"),
            Self::GasLimitTooLow { required } => {
                write!(f, "gas limit is too low. Need at least {required}")
            }
        }
    }
}

impl Transaction {
    /// Gas charged for the calldata.
    pub fn data_fee(&self) -> U256 {
        let zero_price = U256::from(self.common.gas_price(GasPrice::TxDataZero));
        let non_zero_price = U256::from(self.common.gas_price(GasPrice::TxDataNonZero));
        let zeros = self.data().iter().filter(|b| **b == 0).count();
        let non_zeros = self.data().len() - zeros;
        U256::from(zeros) * zero_price + U256::from(non_zeros) * non_zero_price
    }

    /// Minimum gas the transaction needs before executing anything.
    pub fn base_fee(&self) -> U256 {
        let mut fee = self.data_fee() + U256::from(self.common.gas_price(GasPrice::Tx));
        if self.common.gte_hardfork(CREATION_FEE_HARDFORK) && self.to_creation_address() {
            fee = fee + U256::from(self.common.gas_price(GasPrice::TxCreation));
        }
        fee
    }

    /// Wei the sender must hold up front: `gasLimit * gasPrice + value`.
    pub fn upfront_cost(&self) -> U512 {
        let gas_limit = self.quantity(Field::GasLimit);
        let gas_price = self.quantity(Field::GasPrice);
        gas_limit.full_mul(gas_price) + U512::from(self.quantity(Field::Value))
    }

    /// Everything wrong with the transaction, in check order. Empty means
    /// valid.
    pub fn validation_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if !self.verify_signature() {
            issues.push(ValidationIssue::InvalidSignature);
        }
        let required = self.base_fee();
        if required > self.quantity(Field::GasLimit) {
            issues.push(ValidationIssue::GasLimitTooLow { required });
        }
        issues
    }

    /// `true` if the signature verifies and the gas limit covers the base fee.
    pub fn validate(&self) -> bool {
        self.validation_issues().is_empty()
    }

    /// Human-readable issues joined by a single space; empty if valid.
    pub fn validate_report(&self) -> String {
        self.validation_issues()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Numeric value of a word-bounded field.
    fn quantity(&self, field: Field) -> U256 {
        // Canonicalization caps these at 32 bytes.
        to_u256(self.field(field)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Chain, Hardfork};
    use crate::crypto::EthKeypair;
    use crate::transaction::{TxData, TxOptions};

    fn call_data() -> Vec<u8> {
        // Three zero bytes, two non-zero.
        vec![0x00, 0xab, 0x00, 0x00, 0x01]
    }

    #[test]
    fn data_fee_follows_the_schedule() {
        let data = TxData::new().with_data(call_data());
        let petersburg = Transaction::from_data(data.clone(), TxOptions::default()).unwrap();
        assert_eq!(petersburg.data_fee(), U256::from(3 * 4 + 2 * 68u64));

        let istanbul = Transaction::from_data(
            data,
            TxOptions::new().with_hardfork(Hardfork::Istanbul),
        )
        .unwrap();
        assert_eq!(istanbul.data_fee(), U256::from(3 * 4 + 2 * 16u64));
    }

    #[test]
    fn creation_surcharge_starts_at_homestead() {
        let creation = TxData::new();
        let chainstart = Transaction::from_data(
            creation.clone(),
            TxOptions::new().with_hardfork(Hardfork::Chainstart),
        )
        .unwrap();
        assert_eq!(chainstart.base_fee(), U256::from(21_000u64));

        let homestead = Transaction::from_data(
            creation,
            TxOptions::new().with_hardfork(Hardfork::Homestead),
        )
        .unwrap();
        assert_eq!(homestead.base_fee(), U256::from(53_000u64));

        let call = Transaction::from_data(
            TxData::new().with_to([1u8; 20]),
            TxOptions::new().with_hardfork(Hardfork::Homestead),
        )
        .unwrap();
        assert_eq!(call.base_fee(), U256::from(21_000u64));
    }

    #[test]
    fn upfront_cost_is_exact_for_huge_values() {
        let data = TxData::new()
            .with_gas_limit(U256::MAX)
            .with_gas_price(U256::MAX)
            .with_value(U256::MAX);
        let tx = Transaction::from_data(data, TxOptions::default()).unwrap();
        let max = U512::from(U256::MAX);
        assert_eq!(tx.upfront_cost(), max * max + max);
    }

    #[test]
    fn validation_reports_in_order() {
        let tx = Transaction::from_data(
            TxData::new().with_gas_limit(100u64).with_to([1u8; 20]),
            TxOptions::default(),
        )
        .unwrap();
        assert!(!tx.validate());
        assert_eq!(
            tx.validation_issues(),
            vec![
                ValidationIssue::InvalidSignature,
                ValidationIssue::GasLimitTooLow {
                    required: U256::from(21_000u64)
                }
            ]
        );
        assert_eq!(
            tx.validate_report(),
            "Invalid Signature gas limit is too low. Need at least 21000"
        );
    }

    #[test]
    fn signed_transaction_with_enough_gas_is_valid() {
        let mut tx = Transaction::from_data(
            TxData::new()
                .with_gas_limit(21_000u64)
                .with_gas_price(1u64)
                .with_to([1u8; 20]),
            TxOptions::new().with_chain(Chain::Mainnet),
        )
        .unwrap();
        tx.sign(&EthKeypair::generate()).unwrap();
        assert!(tx.validate());
        assert_eq!(tx.validate_report(), "");
    }

    #[test]
    fn custom_gas_prices_feed_the_fee() {
        use crate::chain::{ChainContext, ChainSpec, Common};
        use std::sync::Arc;

        let spec = ChainSpec::from_json(
            r#"{ "name": "cheap", "chainId": 7, "gasPrices": { "tx": 1000, "txDataNonZero": 1 } }"#,
        )
        .unwrap();
        let common: Arc<dyn ChainContext> = Arc::new(Common::custom(spec, Hardfork::Istanbul));
        let tx = Transaction::from_data(
            TxData::new().with_to([1u8; 20]).with_data(call_data()),
            TxOptions::new().with_common(common),
        )
        .unwrap();
        assert_eq!(tx.base_fee(), U256::from(1000 + 3 * 4 + 2u64));
    }
}

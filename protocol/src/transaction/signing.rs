//! Transaction hashing and signing.
//!
//! There are two hashes of a legacy transaction:
//!
//! - the **transaction hash**, Keccak-256 of the full nine-field RLP, which
//!   identifies a signed transaction on chain;
//! - the **signing hash**, which is what the sender's key actually signs.
//!
//! The signing hash comes in two forms. Pre-EIP-155 it covers only the first
//! six fields, so a signature is valid on every chain that shares the
//! account (which is exactly how ETC users got their ETH transactions
//! replayed in 2016). With EIP-155 it covers all nine fields with `v`
//! replaced by the chain id and `r`, `s` emptied, binding the signature to
//! one chain.
//!
//! The substituted list is built as a borrowed view over the stored fields.
//! Nothing is ever written to `v`, `r` or `s` while hashing.

use ethereum_types::{H256, U256};
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::builder::{chain_id_from_v, Transaction};
use super::error::TransactionError;
use super::fields::{minimal_u256, minimal_u64, strip_leading_zeros, to_u256};
use super::types::Field;
use crate::config::{
    EIP155_LEGACY_DELTA, EIP155_V_OFFSET, REPLAY_PROTECTION_HARDFORK, TX_FIELD_COUNT,
    UNSIGNED_FIELD_COUNT,
};
use crate::crypto::{ecsign, rlp_hash, EthKeypair};

impl Transaction {
    /// Keccak-256 of the transaction.
    ///
    /// With `include_signature` this is the transaction hash over all nine
    /// fields. Without it, it is the signing hash, in whichever form
    /// [`uses_eip155_signing_form`](Self::uses_eip155_signing_form) picks.
    pub fn hash(&self, include_signature: bool) -> H256 {
        if include_signature {
            return rlp_hash(&self.raw);
        }

        if !self.uses_eip155_signing_form() {
            trace!("signing hash over the six unsigned fields");
            return rlp_hash(&self.raw[..UNSIGNED_FIELD_COUNT]);
        }

        trace!(chain_id = self.chain_id, "signing hash in EIP-155 form");
        let chain_id = minimal_u64(self.chain_id);
        let mut items: [&[u8]; TX_FIELD_COUNT] = [&[]; TX_FIELD_COUNT];
        for (item, field) in items.iter_mut().zip(&self.raw[..UNSIGNED_FIELD_COUNT]) {
            *item = field.as_slice();
        }
        items[Field::V.index()] = chain_id.as_slice();
        rlp_hash(&items)
    }

    /// Shorthand for `hash(false)`.
    pub fn signing_hash(&self) -> H256 {
        self.hash(false)
    }

    /// `true` if the signing hash covers the chain id.
    ///
    /// An unsigned transaction uses the EIP-155 form whenever it has a
    /// non-zero chain id. A signed one uses it only if replay protection is
    /// active and its `v` is in EIP-155 form for this chain, so that old
    /// signatures keep verifying the way they were made.
    pub fn uses_eip155_signing_form(&self) -> bool {
        if !self.is_signed() {
            return self.chain_id > 0;
        }
        self.has_eip155_v()
    }

    /// `v ∈ {2·chainId + 35, 2·chainId + 36}` under replay protection.
    pub(super) fn has_eip155_v(&self) -> bool {
        if !self.common.gte_hardfork(REPLAY_PROTECTION_HARDFORK) {
            return false;
        }
        let Some(v) = to_u256(self.v()) else {
            return false;
        };
        let base = self.eip155_v_base();
        v == base || v == base + U256::one()
    }

    /// `2·chainId + 35`.
    pub(super) fn eip155_v_base(&self) -> U256 {
        U256::from(self.chain_id) * U256::from(2u64) + U256::from(EIP155_V_OFFSET)
    }

    /// Signs the transaction, overwriting `v`, `r` and `s`.
    ///
    /// `v` ends up as `27 + recovery_id`, plus `2·chainId + 8` when the
    /// EIP-155 signing form was used. The sender caches are dropped.
    ///
    /// Re-signing a transaction whose `v` already commits to a different
    /// chain is refused with [`TransactionError::ChainIdMismatch`]: the chain
    /// id is fixed at construction and will not follow a new `v`.
    ///
    /// A chain id without replay protection is refused with
    /// [`TransactionError::ReplayProtectionInactive`]. Before spuriousDragon
    /// an EIP-155 `v` is not recognised, so the signature would not verify.
    pub fn sign(&mut self, keypair: &EthKeypair) -> Result<(), TransactionError> {
        if self.is_signed() {
            // A v wider than a word commits to nothing and is overwritten.
            if let Some(v) = to_u256(self.v()) {
                if v >= U256::from(EIP155_V_OFFSET) {
                    let encoded = chain_id_from_v(self.v())?;
                    if encoded != self.chain_id {
                        return Err(TransactionError::ChainIdMismatch {
                            resolved: self.chain_id,
                            encoded,
                        });
                    }
                }
            }
        }

        let eip155 = self.uses_eip155_signing_form();
        if eip155 && !self.common.gte_hardfork(REPLAY_PROTECTION_HARDFORK) {
            return Err(TransactionError::ReplayProtectionInactive {
                chain_id: self.chain_id,
                hardfork: self.common.hardfork(),
            });
        }
        let digest = self.hash(false);
        let signature =
            ecsign(&digest, keypair).map_err(|e| TransactionError::Signing(e.to_string()))?;

        let mut v = U256::from(signature.v);
        if eip155 {
            v = v + U256::from(self.chain_id) * U256::from(2u64) + U256::from(EIP155_LEGACY_DELTA);
        }

        self.raw[Field::V.index()] = minimal_u256(v);
        self.raw[Field::R.index()] = strip_leading_zeros(&signature.r).to_vec();
        self.raw[Field::S.index()] = strip_leading_zeros(&signature.s).to_vec();
        self.sender_public_key = OnceLock::new();
        self.sender_address = OnceLock::new();

        debug!(
            chain_id = self.chain_id,
            eip155,
            signing_hash = %hex::encode(digest),
            "transaction signed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Chain, Hardfork};
    use crate::transaction::{TxData, TxOptions};

    fn key() -> EthKeypair {
        EthKeypair::from_bytes(&[0x46; 32]).unwrap()
    }

    fn transfer() -> TxData {
        TxData::new()
            .with_nonce(9u64)
            .with_gas_price(20_000_000_000u64)
            .with_gas_limit(21_000u64)
            .with_to([0x35u8; 20])
            .with_value(U256::exp10(18))
    }

    #[test]
    fn eip155_reference_vector() {
        let mut tx =
            Transaction::from_data(transfer(), TxOptions::new().with_chain(Chain::Mainnet)).unwrap();
        assert!(tx.uses_eip155_signing_form());
        assert_eq!(
            hex::encode(tx.hash(false)),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );

        tx.sign(&key()).unwrap();
        assert_eq!(tx.v(), &[37]);
        assert_eq!(
            hex::encode(tx.serialize()),
            "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
        assert_eq!(
            hex::encode(tx.hash(true)),
            "33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788"
        );
        // Still the EIP-155 form once signed, so the signing hash is stable.
        assert_eq!(
            hex::encode(tx.hash(false)),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn unsigned_without_chain_id_uses_legacy_form() {
        let mut tx = Transaction::from_data(transfer(), TxOptions::default()).unwrap();
        assert_eq!(tx.chain_id(), 0);
        assert!(!tx.uses_eip155_signing_form());
        assert_eq!(
            hex::encode(tx.hash(false)),
            "f9e36c28c8cb35adba138005c02ab7aa7fbcd891f3139cb2eeed052a51cd2713"
        );
        tx.sign(&key()).unwrap();
        assert_eq!(tx.v(), &[27]);
    }

    #[test]
    fn hashing_leaves_signature_fields_alone() {
        let tx =
            Transaction::from_data(transfer(), TxOptions::new().with_chain(Chain::Mainnet)).unwrap();
        let before = tx.raw().clone();
        let first = tx.hash(false);
        assert_eq!(tx.hash(false), first);
        assert_eq!(tx.raw(), &before);
        assert_eq!(tx.v(), &[1]);
        assert!(tx.r().is_empty() && tx.s().is_empty());
    }

    #[test]
    fn chain_id_without_replay_protection_is_refused() {
        for hardfork in [Hardfork::Homestead, Hardfork::TangerineWhistle] {
            let mut tx = Transaction::from_data(
                transfer(),
                TxOptions::new().with_chain(Chain::Mainnet).with_hardfork(hardfork),
            )
            .unwrap();
            // Unsigned with a chain id: EIP-155 form regardless of hardfork.
            assert!(tx.uses_eip155_signing_form());
            assert_eq!(
                tx.sign(&key()),
                Err(TransactionError::ReplayProtectionInactive {
                    chain_id: 1,
                    hardfork
                })
            );
            assert!(!tx.is_signed());
            assert_eq!(tx.v(), &[1]);
        }
    }

    #[test]
    fn signed_transactions_verify_under_every_hardfork() {
        for hardfork in Hardfork::ALL {
            let replay_protected = hardfork >= REPLAY_PROTECTION_HARDFORK;
            let options = if replay_protected {
                TxOptions::new().with_chain(Chain::Mainnet).with_hardfork(hardfork)
            } else {
                TxOptions::new().with_hardfork(hardfork)
            };
            let mut tx = Transaction::from_data(transfer(), options).unwrap();
            tx.sign(&key()).unwrap();
            assert!(tx.verify_signature(), "{hardfork}");
            assert_eq!(tx.validate_report(), "", "{hardfork}");
            if replay_protected {
                assert_eq!(tx.v(), &[37]);
            }
        }
    }

    #[test]
    fn oversized_v_is_overwritten_on_sign() {
        let mut fields = vec![Vec::new(); TX_FIELD_COUNT];
        fields[Field::To.index()] = vec![0x35; 20];
        fields[Field::V.index()] = vec![0xff; 33];
        fields[Field::R.index()] = vec![1];
        fields[Field::S.index()] = vec![1];
        let mut tx =
            Transaction::from_fields(fields, TxOptions::new().with_chain(Chain::Mainnet)).unwrap();
        assert!(tx.is_signed());

        tx.sign(&key()).unwrap();
        assert!(tx.v() == [27] || tx.v() == [28]);
        assert!(tx.verify_signature());
    }

    #[test]
    fn resigning_for_the_same_chain_is_fine() {
        let mut tx =
            Transaction::from_data(transfer(), TxOptions::new().with_chain(Chain::Mainnet)).unwrap();
        tx.sign(&key()).unwrap();
        let first = tx.serialize();
        tx.sign(&key()).unwrap();
        assert_eq!(tx.serialize(), first);
    }

    #[test]
    fn resigning_for_another_chain_is_refused() {
        let mut signed =
            Transaction::from_data(transfer(), TxOptions::new().with_chain(Chain::Mainnet)).unwrap();
        signed.sign(&key()).unwrap();

        let mut tx = Transaction::from_rlp(
            &signed.serialize(),
            TxOptions::new().with_chain(Chain::Ropsten),
        )
        .unwrap();
        assert_eq!(tx.chain_id(), 3);
        assert_eq!(
            tx.sign(&key()),
            Err(TransactionError::ChainIdMismatch {
                resolved: 3,
                encoded: 1
            })
        );
        // Nothing was touched.
        assert_eq!(tx.serialize(), signed.serialize());
    }
}

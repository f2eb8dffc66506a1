//! Signature verification and sender recovery.
//!
//! A legacy transaction does not name its sender. The sender is whoever's
//! public key falls out of ECDSA recovery over the signing hash, so
//! "verifying" a transaction and "finding out who sent it" are the same
//! operation. Both results are cached on the transaction until the next
//! [`sign`](Transaction::sign).
//!
//! [`Transaction::verify_signature`] never fails loudly: a malformed or
//! forged signature is just `false`, with the reason logged at `debug`.

use ethereum_types::{Address, U256};
use tracing::debug;

use super::builder::Transaction;
use super::error::TransactionError;
use super::fields::to_u256;
use crate::config::{LEGACY_V_OFFSET, MALLEABILITY_HARDFORK};
use crate::crypto::{ecrecover, is_low_s, public_to_address, PublicKey, SignatureError};

impl Transaction {
    /// `true` if the signature recovers to a public key under the active
    /// rules.
    ///
    /// From homestead on, signatures with `s > secp256k1n / 2` are rejected
    /// (EIP-2). The recovery id is taken from `v` relative to the EIP-155
    /// base when `v` is in EIP-155 form for this chain and replay protection
    /// is active, and relative to 27 otherwise.
    pub fn verify_signature(&self) -> bool {
        if self.sender_public_key.get().is_some() {
            return true;
        }
        match self.recover_sender() {
            Ok(public_key) => {
                let _ = self.sender_public_key.set(public_key);
                true
            }
            Err(reason) => {
                debug!(%reason, chain_id = self.chain_id, "signature verification failed");
                false
            }
        }
    }

    /// Public key of the sender.
    ///
    /// # Errors
    ///
    /// [`TransactionError::InvalidSignature`] if the signature does not
    /// verify.
    pub fn sender_public_key(&self) -> Result<PublicKey, TransactionError> {
        if !self.verify_signature() {
            return Err(TransactionError::InvalidSignature);
        }
        self.sender_public_key
            .get()
            .copied()
            .ok_or(TransactionError::InvalidSignature)
    }

    /// Address of the sender.
    pub fn sender_address(&self) -> Result<Address, TransactionError> {
        if let Some(address) = self.sender_address.get() {
            return Ok(*address);
        }
        let public_key = self.sender_public_key()?;
        Ok(*self
            .sender_address
            .get_or_init(|| public_to_address(&public_key)))
    }

    fn recover_sender(&self) -> Result<PublicKey, SignatureError> {
        if self.common.gte_hardfork(MALLEABILITY_HARDFORK) && !is_low_s(self.s()) {
            return Err(SignatureError::Malformed("s is above secp256k1n/2"));
        }

        let v = to_u256(self.v()).ok_or(SignatureError::Malformed("v wider than 256 bits"))?;
        let offset = if self.has_eip155_v() {
            self.eip155_v_base()
        } else {
            U256::from(LEGACY_V_OFFSET)
        };
        let recovery_id = match v.checked_sub(offset) {
            Some(id) if id <= U256::one() => id.as_u64(),
            Some(id) => return Err(SignatureError::InvalidRecoveryId(id.low_u64())),
            None => return Err(SignatureError::Malformed("v below the recovery offset")),
        };

        ecrecover(&self.hash(false), recovery_id, self.r(), self.s())
    }
}

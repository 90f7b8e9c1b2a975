//! Transaction type for the fugue execution core

use crate::primitives::{Address, TransactionId};
use bytes::Bytes;
use sha3::{Digest, Keccak256};

/// A transaction submitted for execution.
///
/// Opaque to the dispatch engine: only the content-derived identity and
/// the resource usage (via a detector) matter for scheduling. The
/// executive interprets the rest. Immutable once submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Sender account
    pub from: Address,
    /// Recipient account (contract or transferee)
    pub to: Address,
    /// Value moved from sender to recipient
    pub amount: u128,
    /// Method name to invoke on the recipient
    pub method: String,
    /// Opaque call parameters
    pub params: Bytes,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        from: Address,
        to: Address,
        amount: u128,
        method: impl Into<String>,
        params: impl Into<Bytes>,
    ) -> Self {
        Self {
            from,
            to,
            amount,
            method: method.into(),
            params: params.into(),
        }
    }

    /// Create a plain value transfer
    pub fn transfer(from: Address, to: Address, amount: u128) -> Self {
        Self::new(from, to, amount, "Transfer", Bytes::new())
    }

    /// Content-derived transaction identity.
    ///
    /// keccak256 over the canonical field encoding, so identical
    /// transactions share an id and ids are stable across processes.
    pub fn id(&self) -> TransactionId {
        let mut hasher = Keccak256::new();
        hasher.update(self.from.as_bytes());
        hasher.update(self.to.as_bytes());
        hasher.update(self.amount.to_be_bytes());
        hasher.update((self.method.len() as u64).to_be_bytes());
        hasher.update(self.method.as_bytes());
        hasher.update(&self.params);
        let digest: [u8; 32] = hasher.finalize().into();
        TransactionId::from_bytes(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_transfer_constructor() {
        let tx = Transaction::transfer(addr(1), addr(2), 10);
        assert_eq!(tx.from, addr(1));
        assert_eq!(tx.to, addr(2));
        assert_eq!(tx.amount, 10);
        assert_eq!(tx.method, "Transfer");
        assert!(tx.params.is_empty());
    }

    #[test]
    fn test_id_is_deterministic() {
        let a = Transaction::transfer(addr(1), addr(2), 10);
        let b = Transaction::transfer(addr(1), addr(2), 10);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_changes_with_content() {
        let a = Transaction::transfer(addr(1), addr(2), 10);
        let b = Transaction::transfer(addr(1), addr(2), 11);
        let c = Transaction::transfer(addr(2), addr(1), 10);
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_id_covers_method_and_params() {
        let a = Transaction::new(addr(1), addr(2), 0, "Mint", Bytes::from_static(b"x"));
        let b = Transaction::new(addr(1), addr(2), 0, "Mint", Bytes::from_static(b"y"));
        let c = Transaction::new(addr(1), addr(2), 0, "Burn", Bytes::from_static(b"x"));
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_method_length_prefix_prevents_ambiguity() {
        // "ab" + params "c" must not collide with "a" + params "bc"
        let a = Transaction::new(addr(1), addr(2), 0, "ab", Bytes::from_static(b"c"));
        let b = Transaction::new(addr(1), addr(2), 0, "a", Bytes::from_static(b"bc"));
        assert_ne!(a.id(), b.id());
    }
}

//! Resource usage detection - the conflict oracle

use fugue_types::{ResourceKey, Transaction};
use std::collections::HashSet;

/// Capability for mapping a transaction to the state it may touch.
///
/// The grouping engine only consumes this; inferring resources from
/// transaction contents belongs to the surrounding node. A transaction
/// with an empty resource set never conflicts and is always
/// parallel-eligible.
pub trait ResourceUsageDetector: Send + Sync {
    /// Return the set of resource keys the transaction may read or write
    fn resources(&self, tx: &Transaction) -> HashSet<ResourceKey>;
}

/// Stock detector marking the sender and recipient accounts as touched.
///
/// Sufficient for value transfers; contract-aware nodes plug in their
/// own detector.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccountTouchDetector;

impl ResourceUsageDetector for AccountTouchDetector {
    fn resources(&self, tx: &Transaction) -> HashSet<ResourceKey> {
        let mut keys = HashSet::with_capacity(2);
        keys.insert(ResourceKey::account(&tx.from));
        keys.insert(ResourceKey::account(&tx.to));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugue_types::Address;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_touches_both_accounts() {
        let tx = Transaction::transfer(addr(1), addr(2), 10);
        let keys = AccountTouchDetector.resources(&tx);

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&ResourceKey::account(&addr(1))));
        assert!(keys.contains(&ResourceKey::account(&addr(2))));
    }

    #[test]
    fn test_self_transfer_touches_one_account() {
        let tx = Transaction::transfer(addr(1), addr(1), 10);
        let keys = AccountTouchDetector.resources(&tx);
        assert_eq!(keys.len(), 1);
    }
}

//! Resource keys - opaque tokens for contended ledger state

use crate::primitives::Address;
use bytes::Bytes;
use std::fmt;

/// An opaque, hashable token naming one unit of contended state.
///
/// Two transactions conflict exactly when their resource sets intersect.
/// The grouping engine never inspects the contents; only equality and
/// hashing matter.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(Bytes);

impl ResourceKey {
    /// Create a resource key from raw bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        ResourceKey(bytes.into())
    }

    /// Resource key for an account's balance state
    pub fn account(address: &Address) -> Self {
        ResourceKey(Bytes::copy_from_slice(address.as_bytes()))
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKey(0x{})", hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_account_keys_compare_by_address() {
        let a = Address::from_bytes([1; 20]);
        let b = Address::from_bytes([2; 20]);

        assert_eq!(ResourceKey::account(&a), ResourceKey::account(&a));
        assert_ne!(ResourceKey::account(&a), ResourceKey::account(&b));
    }

    #[test]
    fn test_raw_and_account_keys_share_one_space() {
        let addr = Address::from_bytes([7; 20]);
        let from_account = ResourceKey::account(&addr);
        let from_raw = ResourceKey::new(addr.as_bytes().to_vec());
        assert_eq!(from_account, from_raw);
    }

    #[test]
    fn test_usable_in_hash_set() {
        let mut set = HashSet::new();
        set.insert(ResourceKey::new(vec![1, 2, 3]));
        set.insert(ResourceKey::new(vec![1, 2, 3]));
        set.insert(ResourceKey::new(vec![4]));
        assert_eq!(set.len(), 2);
    }
}

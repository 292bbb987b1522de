use parking_lot::RwLock;
use std::collections::HashSet;

/// Process-lifetime record of invalidated tokens.
///
/// Implementations must be safe under concurrent revoke and lookup from
/// in-flight requests. The store is injected into whatever composes identity
/// resolution so tests can hand in a fresh instance and a persistent store
/// can be swapped in later.
pub trait RevocationStore: Send + Sync {
    /// Idempotent insert. Revoking an already-revoked token is a no-op.
    fn revoke(&self, token: &str);

    fn is_revoked(&self, token: &str) -> bool;
}

/// In-memory store over a lock-protected set. Entries are never pruned;
/// revocations are lost on process restart, which is acceptable only while
/// tokens are short-lived.
#[derive(Default)]
pub struct MemoryRevocationStore {
    revoked: RwLock<HashSet<String>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationStore for MemoryRevocationStore {
    fn revoke(&self, token: &str) {
        self.revoked.write().insert(token.to_string());
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.revoked.read().contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_revoke_and_lookup() {
        let store = MemoryRevocationStore::new();
        assert!(!store.is_revoked("token-a"));

        store.revoke("token-a");
        assert!(store.is_revoked("token-a"));
        assert!(!store.is_revoked("token-b"));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let store = MemoryRevocationStore::new();
        store.revoke("token-a");
        store.revoke("token-a");
        assert!(store.is_revoked("token-a"));
    }

    #[test]
    fn test_concurrent_revocations_all_land() {
        let store = Arc::new(MemoryRevocationStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..50 {
                        store.revoke(&format!("token-{}-{}", i, j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..8 {
            for j in 0..50 {
                assert!(store.is_revoked(&format!("token-{}-{}", i, j)));
            }
        }
    }
}

//! Per-owner serialization of ledger writes.
//!
//! Discord events are handled concurrently, so a "delete last" could otherwise race a
//! save from the same owner. Writers for one owner take that owner's lock; different
//! owners never wait on each other.
//!
//! Entries nobody holds or waits on are pruned on the next acquire, so the table only
//! tracks owners with writes in flight.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lazily created async mutex per owner id
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and returns exclusive access to `owner_id`'s ledger.
    pub async fn acquire(&self, owner_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Only the table holds a count of 1: no guard, no waiter
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(owner_id).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_owner_is_serialized() {
        let locks = OwnerLocks::new();
        let guard = locks.acquire(1).await;

        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(1)).await;
        assert!(second.is_err(), "second acquire should wait");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire(1)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_released_owners_are_pruned() {
        let locks = OwnerLocks::new();
        let held = locks.acquire(1).await;
        drop(locks.acquire(2).await);
        drop(locks.acquire(3).await);

        let _guard = locks.acquire(4).await;
        let tracked: Vec<i64> = {
            let table = locks.locks.lock().await;
            let mut ids: Vec<i64> = table.keys().copied().collect();
            ids.sort_unstable();
            ids
        };
        assert_eq!(tracked, vec![1, 4]);
        drop(held);
    }

    #[tokio::test]
    async fn test_different_owners_do_not_block() {
        let locks = OwnerLocks::new();
        let _first = locks.acquire(1).await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire(2)).await;
        assert!(other.is_ok());
    }
}

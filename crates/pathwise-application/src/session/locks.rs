use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Registry of per-user locks.
///
/// Holding the guard returned by [`acquire`](Self::acquire) serializes every
/// read-modify-write of one user's dialog state. Different users never
/// contend. An entry lives until [`release`](Self::release) finds it unused.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<RwLock<HashMap<String, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `user_id`'s state.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let existing = {
            let locks = self.locks.read().await;
            locks.get(user_id).cloned()
        };

        let lock = match existing {
            Some(lock) => lock,
            None => {
                let mut locks = self.locks.write().await;
                locks.entry(user_id.to_string()).or_default().clone()
            }
        };

        lock.lock_owned().await
    }

    /// Drops `user_id`'s entry if nobody holds or waits on it.
    ///
    /// Returns whether the entry was removed.
    pub async fn release(&self, user_id: &str) -> bool {
        let mut locks = self.locks.write().await;
        // Guards and waiters hold their own clone of the Arc
        let unused = locks
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if unused {
            locks.remove(user_id);
        }
        unused
    }

    /// Number of users with a registered lock.
    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }
}

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::OwnedMutexGuard;

type LockKey = (String, String);
type LockMap = HashMap<LockKey, Arc<tokio::sync::Mutex<()>>>;

///
/// Async locks keyed by (recipient_id, channel_type).
///
/// Entry lives only while some run holds or waits for it.
///
#[derive(Default)]
pub struct RecipientLocks {
    locks: Arc<Mutex<LockMap>>,
}

impl RecipientLocks {
    pub async fn lock(&self, recipient_id: &str, channel_type: &str) -> RecipientLockGuard {
        let key = (recipient_id.to_string(), channel_type.to_string());

        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        let guard = mutex.lock_owned().await;

        RecipientLockGuard {
            key,
            locks: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct RecipientLockGuard {
    key: LockKey,
    locks: Arc<Mutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RecipientLockGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.guard.take());

        // only the map itself references the lock
        let unused = locks
            .get(&self.key)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1);
        if unused {
            locks.remove(&self.key);
        }
    }
}

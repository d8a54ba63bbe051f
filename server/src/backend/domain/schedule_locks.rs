//! Per-reminder locks serializing read-modify-write cycles.
//!
//! Every mutation of a stored reminder holds the lock for its id from the read
//! until the write has landed, so two marks against the same reminder cannot
//! overwrite each other. Different ids never contend.
//!
//! An id only has an entry while someone holds or waits for its lock. The last
//! guard to drop removes it, so ids that never existed leave nothing behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

#[derive(Clone, Default)]
pub struct ScheduleLocks {
    locks: LockMap,
}

/// Exclusive access to one reminder id, released on drop
pub struct ScheduleGuard {
    guard: Option<OwnedMutexGuard<()>>,
    reminder_id: String,
    locks: LockMap,
}

impl Drop for ScheduleGuard {
    fn drop(&mut self) {
        // Release the mutex first so its Arc no longer counts this holder.
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let idle = locks
            .get(&self.reminder_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.reminder_id);
        }
    }
}

impl ScheduleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `reminder_id`
    pub async fn acquire(&self, reminder_id: &str) -> ScheduleGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(reminder_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        ScheduleGuard {
            guard: Some(lock.lock_owned().await),
            reminder_id: reminder_id.to_string(),
            locks: self.locks.clone(),
        }
    }

    /// Number of ids currently held or awaited
    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}

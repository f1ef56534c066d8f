use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Advisory per-key mutexes.
///
/// Used to serialize check-then-insert sections that span multiple store
/// calls: per-listing for the booking overlap check, per-booking for payment
/// initiation. These are application locks, not store locks, so holding one
/// across a gateway await is safe. Slots are retained for the process
/// lifetime; the key space is bounded by the number of listings/bookings.
pub struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Waits for and takes the lock for `key`. The returned guard releases
    /// the key on drop.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key).or_default())
        };
        slot.lock_owned().await
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}

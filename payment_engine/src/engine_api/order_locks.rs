use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::db_types::OrderId;

/// A keyed async mutex. Holding the guard for an order id excludes every other holder of the same id, and nobody else.
///
/// Entries are dropped once nobody holds or waits on them, so the map only grows with the number of orders that are
/// in flight.
#[derive(Debug, Clone, Default)]
pub struct OrderLocks {
    locks: Arc<Mutex<HashMap<OrderId, Weak<AsyncMutex<()>>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, order_id: &OrderId) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| lock.strong_count() > 0);
            match locks.get(order_id).and_then(Weak::upgrade) {
                Some(mutex) => mutex,
                None => {
                    let mutex = Arc::new(AsyncMutex::new(()));
                    locks.insert(order_id.clone(), Arc::downgrade(&mutex));
                    mutex
                },
            }
        };
        mutex.lock_owned().await
    }

    /// The number of order ids that are currently locked or waited on.
    pub fn in_flight(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.values().filter(|lock| lock.strong_count() > 0).count()
    }
}

//! Time-bounded per-user lock around address generation.
//!
//! A registration transaction is only visible to `getAccount` once it is
//! mined, so a second lookup inside that window would see "not registered"
//! and generate a second key. The lock is taken with an atomic
//! check-and-set before generating and expires on its own after `window`.

use std::collections::HashMap;
use std::time::Duration;

use nastip_types::UserId;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct GenerationLock {
    window: Duration,
    held: Mutex<HashMap<UserId, Instant>>,
}

impl GenerationLock {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            held: Mutex::new(HashMap::new()),
        }
    }

    /// Take the lock for `user`. Returns `false` if it is already held and
    /// has not yet expired.
    pub async fn try_acquire(&self, user: UserId) -> bool {
        let now = Instant::now();
        let mut held = self.held.lock().await;
        held.retain(|_, expires| *expires > now);
        if held.contains_key(&user) {
            return false;
        }
        held.insert(user, now + self.window);
        true
    }

    /// Drop the lock early, e.g. after a failed registration.
    pub async fn release(&self, user: UserId) {
        self.held.lock().await.remove(&user);
    }

    pub async fn is_held(&self, user: UserId) -> bool {
        let now = Instant::now();
        self.held
            .lock()
            .await
            .get(&user)
            .is_some_and(|expires| *expires > now)
    }
}

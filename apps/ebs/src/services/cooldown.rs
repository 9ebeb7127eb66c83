//! Per-channel publish cooldown.
//!
//! One lock covers the whole map so the check and the update of a key happen
//! in the same critical section; two callers can never both observe
//! "permitted" for one key inside a single interval.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default minimum spacing between publishes on one channel.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct CooldownGate {
    interval: Duration,
    next_allowed: Mutex<HashMap<String, Instant>>,
}

impl CooldownGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: Mutex::new(HashMap::new()),
        }
    }

    /// `true` when the caller may publish for `key` now.
    pub fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_at(key, Instant::now())
    }

    /// Same as [`try_acquire`](Self::try_acquire) with an explicit clock reading.
    ///
    /// A denied call leaves the stored deadline untouched.
    pub fn try_acquire_at(&self, key: &str, now: Instant) -> bool {
        let mut next_allowed = self.next_allowed.lock();

        if let Some(next) = next_allowed.get(key) {
            if *next > now {
                return false;
            }
        }

        next_allowed.insert(key.to_owned(), now + self.interval);
        true
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

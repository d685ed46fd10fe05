//! Wall-clock access
//!
//! Scheduling works in local calendar time. The clock is injected so
//! "today" can be pinned in tests.

use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, RwLock};

pub trait Clock: Send + Sync {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// The system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        let mut current = self.now.write().unwrap_or_else(|e| e.into_inner());
        *current = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

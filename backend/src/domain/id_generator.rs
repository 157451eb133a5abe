//! Certificate identifier assignment.
//!
//! Identifiers are wall-clock milliseconds, bumped past the last value handed
//! out so that two creates inside the same millisecond still receive distinct,
//! strictly increasing ids. The generator is process-local; it is primed at
//! startup with the largest id already persisted in either backend.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier based on the current time
    pub fn next_id(&self) -> i64 {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    /// Next identifier given an explicit clock reading
    pub fn next_id_at(&self, now_millis: i64) -> i64 {
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now_millis.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }

    /// Record an id that already exists so it is never handed out again
    pub fn observe(&self, existing_id: i64) {
        self.last.fetch_max(existing_id, Ordering::AcqRel);
    }
}

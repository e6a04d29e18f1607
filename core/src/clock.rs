//! Monotonic timestamp source.
//!
//! Timestamps are truncated to microseconds, the precision PostgreSQL keeps,
//! and every tick is strictly later than the previous one from the same clock.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct Clock {
    last_micros: AtomicI64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, or one microsecond past the last tick if the wall clock
    /// has not moved forward.
    pub fn tick(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_micros();
        let updated = self
            .last_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)));
        let previous = match updated {
            Ok(previous) | Err(previous) => previous,
        };
        let issued = now.max(previous + 1);
        DateTime::from_timestamp_micros(issued).unwrap_or_else(Utc::now)
    }
}

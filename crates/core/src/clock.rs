// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction.
//!
//! Ledger timestamps, daily code keys and backup names all read "now"
//! through a [`Clock`] so tests can pin and advance time.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64 {
        self.now().timestamp_millis().max(0) as u64
    }
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::Clock;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Controllable clock for tests. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct FakeClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FakeClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(start)),
            }
        }

        /// Clock pinned to noon UTC on the given calendar day.
        pub fn at_date(year: i32, month: u32, day: u32) -> Self {
            let start = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
                .unwrap_or_else(Utc::now);
            Self::new(start)
        }

        pub fn set(&self, at: DateTime<Utc>) {
            *self.now.lock() = at;
        }

        pub fn advance(&self, by: std::time::Duration) {
            let by = Duration::from_std(by).unwrap_or_else(|_| Duration::zero());
            *self.now.lock() += by;
        }
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::at_date(2026, 1, 15)
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;

//! Clock abstraction and billing-cycle date math
//!
//! Billing-cycle boundaries depend on wall-clock "now". Every component that
//! needs the current time receives a [`Clock`] instead of calling
//! `Utc::now()` directly, so cycle-boundary behavior is deterministic in
//! tests.

use chrono::{DateTime, Duration, Months, Utc};
use std::sync::RwLock;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Used by tests (and by replay tooling) to pin "now" at an exact instant
/// and step it across billing-cycle boundaries.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Replaces the current instant
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().expect("manual clock poisoned") = now;
    }

    /// Moves the clock forward by the given duration
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.write().expect("manual clock poisoned");
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().expect("manual clock poisoned")
    }
}

/// Computes the next billing-cycle boundary: one calendar month later,
/// clamped to the end of the month (Jan 31 -> Feb 28/29).
///
/// Returns `None` only if the date arithmetic overflows chrono's range.
pub fn next_cycle_date(from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    from.checked_add_months(Months::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::hours(3));
        assert_eq!(clock.now(), start + Duration::hours(3));
    }

    #[test]
    fn test_next_cycle_date_clamps_month_end() {
        let jan_31 = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let next = next_cycle_date(jan_31).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_next_cycle_date_plain_month() {
        let mar_15 = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let next = next_cycle_date(mar_15).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 4, 15, 9, 30, 0).unwrap());
    }
}

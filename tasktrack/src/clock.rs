//! Time source for deadline checks and close timestamps.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use parking_lot::Mutex;

/// Supplies the current instant and the current calendar date.
pub trait Clock: Send + Sync {
    /// The current instant, recorded as `closed_at` by the sweep.
    fn now(&self) -> DateTime<Utc>;

    /// Today's calendar date, used for deadline validation and overdue checks.
    fn today(&self) -> NaiveDate;

    /// Wall-clock time in the same timezone as [`today`](Self::today), used
    /// to find the next scheduled sweep.
    fn local_now(&self) -> NaiveDateTime;
}

/// Wall clock; "today" is the date in the host's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to. "Today" is the UTC date of `now`.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn today(&self) -> NaiveDate {
        self.now.lock().date_naive()
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now.lock().naive_utc()
    }
}

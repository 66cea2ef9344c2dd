//! Wall-clock source for date-derived task status.
//!
//! # Responsibility
//! - Provide "today" for overdue derivation and begin-date computation.
//! - Provide "now" for completion timestamps.
//!
//! # Invariants
//! - `today()` is a local calendar date; `now()` is UTC.

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current date and instant.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and backfill runs.
#[derive(Debug)]
pub struct FixedClock {
    state: Mutex<(NaiveDate, DateTime<Utc>)>,
}

impl FixedClock {
    /// Pins "today" to `today` and "now" to midday UTC of that date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: Mutex::new((today, midday_utc(today))),
        }
    }

    /// Moves the clock to another day.
    pub fn set_today(&self, today: NaiveDate) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = (today, midday_utc(today));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).0
    }

    fn now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).1
    }
}

fn midday_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(12, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

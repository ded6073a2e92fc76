//! Source of "today" and "now".
//!
//! Services never read the system clock directly so tests can pin the date.

use std::fmt::Debug;

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Supplies the current calendar day and timestamp.
pub trait Clock: Send + Sync + Debug {
    /// Current calendar day in the restaurant's local time.
    fn today(&self) -> NaiveDate;

    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock; the calendar day follows the host's local time zone.
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

/// Clock frozen on a given day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock pinned to `today`, with `now` at midday UTC that day.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_default();
        Self { today, now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_pinned() {
        let Some(day) = NaiveDate::from_ymd_opt(2026, 2, 28) else {
            panic!("valid date");
        };
        let clock = FixedClock::new(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
    }
}

//! Per-restaurant daily counters with lazy midnight reset.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Counters for the current calendar day.
///
/// There is no background timer: every accessor first calls
/// [`DailyStats::refresh`], which zeroes the counters when the stored reset
/// date differs from `today`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    /// Customer messages answered today.
    pub messages_today: u64,
    /// Booking leads detected today.
    pub bookings_today: u64,
    /// Messages per detected customer language.
    pub language_counts: BTreeMap<String, u64>,
    /// Day the counters were last zeroed.
    pub last_reset_date: NaiveDate,
}

impl DailyStats {
    /// Creates zeroed counters for `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            messages_today: 0,
            bookings_today: 0,
            language_counts: BTreeMap::new(),
            last_reset_date: today,
        }
    }

    /// Zeroes every counter if `today` is a new calendar day.
    ///
    /// Returns `true` when a reset happened.
    pub fn refresh(&mut self, today: NaiveDate) -> bool {
        if self.last_reset_date == today {
            return false;
        }
        *self = Self::new(today);
        true
    }

    /// Counts one answered customer message in `language`.
    pub fn record_message(&mut self, today: NaiveDate, language: &str) {
        self.refresh(today);
        self.messages_today = self.messages_today.saturating_add(1);
        let count = self.language_counts.entry(language.to_string()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Counts one booking lead.
    pub fn record_booking(&mut self, today: NaiveDate) {
        self.refresh(today);
        self.bookings_today = self.bookings_today.saturating_add(1);
    }

    /// Refreshes and returns a copy of the counters.
    pub fn snapshot(&mut self, today: NaiveDate) -> Self {
        self.refresh(today);
        self.clone()
    }
}

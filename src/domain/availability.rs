//! Per-restaurant availability state.
//!
//! [`AvailabilityRecord`] holds the coarse "today" status plus the two date
//! sets the owner maintains. The status and the date sets are independent
//! sources of truth: quick status commands also touch today's entry in the
//! date sets, but returning to [`Status::Open`] leaves the sets untouched.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Coarse availability for the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Normal service.
    #[default]
    Open,
    /// Dinner service is fully booked.
    FullTonight,
    /// Lunch service is fully booked.
    FullLunch,
    /// Exceptional closure for the whole day.
    ClosedToday,
}

impl Status {
    /// Human-readable French label, prefixed with a status dot.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "🟢 Ouvert",
            Self::FullTonight => "🔴 Complet ce soir",
            Self::FullLunch => "🔴 Complet ce midi",
            Self::ClosedToday => "🟡 Fermé aujourd'hui",
        }
    }
}

/// Service period a date is fully booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FullPeriod {
    /// Lunch service.
    #[serde(rename = "midi")]
    Lunch,
    /// Dinner service.
    #[serde(rename = "soir")]
    Dinner,
    /// The whole day.
    #[serde(rename = "journée")]
    Day,
}

impl FullPeriod {
    /// Label as stored and shown to the owner and the assistant.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lunch => "midi",
            Self::Dinner => "soir",
            Self::Day => "journée",
        }
    }
}

impl fmt::Display for FullPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which date set a dashboard date entry goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateKind {
    /// Exceptional closure.
    Closed,
    /// Fully booked for the whole day.
    Full,
}

/// Mutable availability state of one restaurant.
///
/// Mutated only by [`super::command::execute`]; the dashboard API goes
/// through the same function so both entry points stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    /// Today's coarse status.
    pub status: Status,
    /// Free text shown to customers regardless of status. Empty when unset.
    pub temp_message: String,
    /// Exceptional full-day closures. Append-only, duplicates allowed,
    /// past entries are never pruned.
    pub closed_dates: Vec<NaiveDate>,
    /// Fully booked dates with the affected service period.
    pub full_dates: BTreeMap<NaiveDate, FullPeriod>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityRecord {
    /// Creates an open record with empty date sets.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: Status::Open,
            temp_message: String::new(),
            closed_dates: Vec::new(),
            full_dates: BTreeMap::new(),
            updated_at: now,
        }
    }

    /// Returns `true` if `date` appears at least once in the closed dates.
    #[must_use]
    pub fn is_closed_on(&self, date: NaiveDate) -> bool {
        self.closed_dates.contains(&date)
    }

    /// Returns the full period recorded for `date`, if any.
    #[must_use]
    pub fn full_period_on(&self, date: NaiveDate) -> Option<FullPeriod> {
        self.full_dates.get(&date).copied()
    }

    /// Returns the temporary message when one is active.
    #[must_use]
    pub fn active_temp_message(&self) -> Option<&str> {
        if self.temp_message.is_empty() {
            None
        } else {
            Some(&self.temp_message)
        }
    }
}

//! Restaurant profile and the per-restaurant mutable aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{AvailabilityRecord, ChannelId, DailyStats, Status};

/// Static information about a restaurant, used to build the system prompt
/// and to reach the owner.
#[derive(Debug, Clone, Default)]
pub struct RestaurantProfile {
    /// Display name.
    pub name: String,
    /// WhatsApp phone number id of the restaurant's endpoint.
    pub channel_id: ChannelId,
    /// Graph API bearer token for this endpoint.
    pub access_token: String,
    /// Owner phone number. Empty disables owner commands and notifications.
    pub owner_phone: String,
    /// Free-form presentation of the restaurant.
    pub description: String,
    /// Menu text.
    pub menu: String,
    /// Opening hours.
    pub hours: String,
    /// Street address.
    pub address: String,
    /// Public phone number.
    pub phone: String,
    /// Tone the assistant should adopt. Empty uses the default tone.
    pub tone: String,
    /// Languages the assistant speaks.
    pub languages: String,
    /// Practical information (parking, terrace, ...).
    pub special_info: String,
    /// Online booking link. Empty makes the assistant collect details.
    pub booking_link: String,
    /// Allergen policy shown to customers.
    pub allergens_policy: String,
}

impl RestaurantProfile {
    /// Returns `true` if `sender` is the configured owner.
    #[must_use]
    pub fn is_owner(&self, sender: &str) -> bool {
        !self.owner_phone.is_empty() && self.owner_phone == sender
    }
}

/// Aggregate stored in the registry for each restaurant.
///
/// The availability record and the daily counters live behind the same
/// per-restaurant lock so that an owner command and a dashboard write never
/// interleave.
#[derive(Debug)]
pub struct RestaurantEntry {
    /// Static profile (immutable after registration).
    pub profile: RestaurantProfile,
    /// Current availability.
    pub availability: AvailabilityRecord,
    /// Today's counters.
    pub stats: DailyStats,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl RestaurantEntry {
    /// Creates an open entry with zeroed counters.
    #[must_use]
    pub fn new(profile: RestaurantProfile, today: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            profile,
            availability: AvailabilityRecord::new(now),
            stats: DailyStats::new(today),
            registered_at: now,
        }
    }
}

/// Lightweight summary of a restaurant for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantSummary {
    /// Channel identifier.
    pub channel_id: ChannelId,
    /// Display name.
    pub name: String,
    /// Today's status.
    pub status: Status,
}

impl From<&RestaurantEntry> for RestaurantSummary {
    fn from(entry: &RestaurantEntry) -> Self {
        Self {
            channel_id: entry.profile.channel_id.clone(),
            name: entry.profile.name.clone(),
            status: entry.availability.status,
        }
    }
}

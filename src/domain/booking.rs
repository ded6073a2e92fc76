//! Booking leads detected in customer messages.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ChannelId;

/// Lowercase fragments that flag a message as a booking request
/// (French, English and Italian).
const BOOKING_KEYWORDS: [&str; 5] = ["réserv", "reserv", "book", "table", "prenot"];

/// Maximum number of characters of the customer message kept in a lead.
pub const EXCERPT_CHARS: usize = 200;

/// Returns `true` if the message looks like a booking request.
#[must_use]
pub fn is_booking_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    BOOKING_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Append-only record of a message that looked like a booking request.
///
/// A lead does not mean a reservation was confirmed.
#[derive(Debug, Clone, Serialize)]
pub struct BookingLead {
    /// Lead identifier.
    pub id: Uuid,
    /// Restaurant the message was sent to.
    pub channel_id: ChannelId,
    /// Customer phone number.
    pub customer_phone: String,
    /// Customer display name, possibly empty.
    pub customer_name: String,
    /// First [`EXCERPT_CHARS`] characters of the message.
    pub excerpt: String,
    /// Detection time.
    pub created_at: DateTime<Utc>,
}

impl BookingLead {
    /// Creates a lead, truncating the message to an excerpt.
    #[must_use]
    pub fn new(
        channel_id: ChannelId,
        customer_phone: &str,
        customer_name: &str,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel_id,
            customer_phone: customer_phone.to_string(),
            customer_name: customer_name.to_string(),
            excerpt: message.chars().take(EXCERPT_CHARS).collect(),
            created_at,
        }
    }
}

/// Process-wide append-only lead log.
#[derive(Debug, Default)]
pub struct BookingLog {
    leads: RwLock<Vec<BookingLead>>,
}

impl BookingLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lead.
    pub async fn record(&self, lead: BookingLead) {
        self.leads.write().await.push(lead);
    }

    /// Leads of one restaurant, oldest first.
    pub async fn for_channel(&self, channel: &ChannelId) -> Vec<BookingLead> {
        self.leads
            .read()
            .await
            .iter()
            .filter(|lead| &lead.channel_id == channel)
            .cloned()
            .collect()
    }
}

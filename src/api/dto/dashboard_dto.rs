//! DTOs for the owner dashboard endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AvailabilityRecord, BookingLead, ConversationSummary, DateKind, RestaurantSummary, Role,
    Status,
};
use crate::service::DashboardSnapshot;

/// Request body for `POST /restaurants/{channel_id}/status`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    /// One of `open`, `full_tonight`, `full_lunch`, `closed_today`.
    #[schema(value_type = String, example = "full_tonight")]
    pub status: Status,
}

/// Request body for `POST /restaurants/{channel_id}/message`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetMessageRequest {
    /// Temporary message; empty clears it.
    #[serde(default)]
    pub message: String,
}

/// Request body for `POST /restaurants/{channel_id}/dates`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddDateRequest {
    /// Calendar date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// `closed` or `full`.
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "closed")]
    pub kind: DateKind,
}

/// Availability record as shown on the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityDto {
    /// Machine status (`open`, `full_tonight`, ...).
    #[schema(value_type = String)]
    pub status: Status,
    /// French status label.
    pub status_label: String,
    /// Temporary message, empty when unset.
    pub temp_message: String,
    /// Exceptional closures, in insertion order.
    pub closed_dates: Vec<NaiveDate>,
    /// Fully booked dates mapped to `midi`, `soir` or `journée`.
    pub full_dates: BTreeMap<String, String>,
    /// Last mutation.
    pub updated_at: DateTime<Utc>,
}

impl From<AvailabilityRecord> for AvailabilityDto {
    fn from(record: AvailabilityRecord) -> Self {
        Self {
            status: record.status,
            status_label: record.status.label().to_string(),
            temp_message: record.temp_message,
            closed_dates: record.closed_dates,
            full_dates: record
                .full_dates
                .into_iter()
                .map(|(date, period)| (date.to_string(), period.label().to_string()))
                .collect(),
            updated_at: record.updated_at,
        }
    }
}

/// Entry of the restaurant list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestaurantDto {
    /// Channel identifier.
    pub channel_id: String,
    /// Display name.
    pub name: String,
    /// Machine status.
    #[schema(value_type = String)]
    pub status: Status,
    /// French status label.
    pub status_label: String,
}

impl From<RestaurantSummary> for RestaurantDto {
    fn from(summary: RestaurantSummary) -> Self {
        Self {
            channel_id: summary.channel_id.to_string(),
            name: summary.name,
            status: summary.status,
            status_label: summary.status.label().to_string(),
        }
    }
}

/// Response for `GET /restaurants`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestaurantListResponse {
    /// Registered restaurants, ordered by channel.
    pub data: Vec<RestaurantDto>,
}

/// One conversation on the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationDto {
    /// Customer phone number.
    pub customer: String,
    /// Stored turns.
    pub turns: usize,
    /// Author of the newest turn (`customer` or `assistant`).
    pub last_role: String,
    /// Newest turn text.
    pub last_message: String,
    /// Newest turn time.
    pub last_at: DateTime<Utc>,
}

impl From<ConversationSummary> for ConversationDto {
    fn from(summary: ConversationSummary) -> Self {
        let last_role = match summary.last.role {
            Role::Customer => "customer",
            Role::Assistant => "assistant",
        };
        Self {
            customer: summary.customer,
            turns: summary.turns,
            last_role: last_role.to_string(),
            last_message: summary.last.content,
            last_at: summary.last.timestamp,
        }
    }
}

/// Response for `GET /restaurants/{channel_id}/dashboard`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Customer messages answered today.
    pub messages_today: u64,
    /// Booking leads detected today.
    pub bookings_today: u64,
    /// Messages per customer language.
    pub language_counts: BTreeMap<String, u64>,
    /// Current availability.
    pub availability: AvailabilityDto,
    /// Conversations held for this restaurant.
    pub conversations_count: usize,
    /// Most recently active conversations, newest first.
    pub recent_conversations: Vec<ConversationDto>,
}

impl From<DashboardSnapshot> for DashboardResponse {
    fn from(snapshot: DashboardSnapshot) -> Self {
        Self {
            messages_today: snapshot.stats.messages_today,
            bookings_today: snapshot.stats.bookings_today,
            language_counts: snapshot.stats.language_counts,
            availability: snapshot.availability.into(),
            conversations_count: snapshot.conversations_count,
            recent_conversations: snapshot
                .recent_conversations
                .into_iter()
                .map(ConversationDto::from)
                .collect(),
        }
    }
}

/// One booking lead.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDto {
    /// Lead identifier.
    pub id: Uuid,
    /// Customer phone number.
    pub customer_phone: String,
    /// Customer display name.
    pub customer_name: String,
    /// Start of the customer message.
    pub excerpt: String,
    /// Detection time.
    pub created_at: DateTime<Utc>,
}

impl From<BookingLead> for BookingDto {
    fn from(lead: BookingLead) -> Self {
        Self {
            id: lead.id,
            customer_phone: lead.customer_phone,
            customer_name: lead.customer_name,
            excerpt: lead.excerpt,
            created_at: lead.created_at,
        }
    }
}

/// Response for `GET /restaurants/{channel_id}/bookings`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Leads in detection order.
    pub data: Vec<BookingDto>,
    /// Number of leads.
    pub total: usize,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::FullPeriod;

    #[test]
    fn add_date_request_uses_type_field() {
        let raw = r#"{"date":"2026-03-01","type":"full"}"#;
        let Ok(req) = serde_json::from_str::<AddDateRequest>(raw) else {
            panic!("parse failed");
        };
        assert_eq!(req.kind, DateKind::Full);
        assert_eq!(NaiveDate::from_ymd_opt(2026, 3, 1), Some(req.date));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<SetStatusRequest>(r#"{"status":"busy"}"#).is_err());
    }

    #[test]
    fn availability_dto_flattens_full_dates() {
        let mut record = AvailabilityRecord::new(Utc::now());
        let Some(date) = NaiveDate::from_ymd_opt(2026, 2, 28) else {
            panic!("valid date");
        };
        record.full_dates.insert(date, FullPeriod::Dinner);
        record.status = Status::FullTonight;

        let dto = AvailabilityDto::from(record);
        assert_eq!(dto.full_dates.get("2026-02-28").map(String::as_str), Some("soir"));
        assert_eq!(dto.status_label, "🔴 Complet ce soir");
    }
}

//! Domain layer: availability state machine, conversations, and stores.
//!
//! This module contains the restaurant model (profile, availability record,
//! daily stats), the owner command grammar and dispatcher, the prompt
//! projection, and the in-memory stores the service layer is built on.

pub mod availability;
pub mod booking;
pub mod channel_id;
pub mod clock;
pub mod command;
pub mod conversation;
pub mod directive;
pub mod inbound;
pub mod prompt;
pub mod prompt_context;
pub mod restaurant;
pub mod restaurant_registry;
pub mod stats;

pub use availability::{AvailabilityRecord, DateKind, FullPeriod, Status};
pub use booking::{BookingLead, BookingLog};
pub use channel_id::ChannelId;
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::CommandContext;
pub use conversation::{ConversationStore, ConversationSummary, Role, Turn};
pub use directive::{Directive, InvalidDate};
pub use inbound::InboundEvent;
pub use restaurant::{RestaurantEntry, RestaurantProfile, RestaurantSummary};
pub use restaurant_registry::RestaurantRegistry;
pub use stats::DailyStats;

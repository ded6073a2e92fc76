//! Relay service: routes inbound messages and serves the dashboard.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::domain::booking::{self, BookingLead};
use crate::domain::command::{self, CommandContext};
use crate::domain::conversation::ConversationSummary;
use crate::domain::prompt::build_system_prompt;
use crate::domain::{
    AvailabilityRecord, BookingLog, ChannelId, Clock, ConversationStore, DailyStats, DateKind,
    Directive, InboundEvent, RestaurantEntry, RestaurantProfile, RestaurantRegistry,
    RestaurantSummary, Role, Status, Turn, directive, prompt_context,
};
use crate::error::GatewayError;
use crate::outbound::{ChatMessage, ChatRole, CompletionClient, MessageSender};

/// Reply sent to the customer when the assistant is unavailable.
pub const FALLBACK_REPLY: &str =
    "Désolé, je rencontre un petit souci technique. Le restaurant va vous répondre directement. 🙏";

/// Number of past turns sent to the assistant with each message.
pub const HISTORY_WINDOW: usize = 10;

/// Number of conversations listed on the dashboard.
pub const DASHBOARD_CONVERSATIONS: usize = 20;

/// Language counted for every customer message.
const DEFAULT_LANGUAGE: &str = "fr";

/// How an inbound message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// The owner sent a command; the reply went back to the owner.
    OwnerCommand {
        /// Text sent to the owner.
        reply: String,
    },
    /// The message went through the assistant.
    CustomerReply {
        /// Text sent to the customer.
        reply: String,
        /// Whether a booking lead was recorded.
        booking_lead: bool,
    },
}

/// Aggregated dashboard view of one restaurant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Today's counters, after the lazy reset.
    pub stats: DailyStats,
    /// Current availability.
    pub availability: AvailabilityRecord,
    /// Conversations held for this restaurant.
    pub conversations_count: usize,
    /// Most recently active conversations, newest first.
    pub recent_conversations: Vec<ConversationSummary>,
}

/// Orchestration layer for owner commands, customer replies and the
/// dashboard.
///
/// Every availability mutation follows the pattern: parse or map to a
/// [`Directive`] → take the restaurant's write lock → apply it with
/// [`command::execute`] → release. Network calls never happen while a
/// restaurant lock is held.
#[derive(Debug, Clone)]
pub struct RelayService {
    registry: Arc<RestaurantRegistry>,
    conversations: Arc<ConversationStore>,
    bookings: Arc<BookingLog>,
    sender: Arc<dyn MessageSender>,
    completion: Arc<dyn CompletionClient>,
    clock: Arc<dyn Clock>,
    completion_timeout: Duration,
}

impl RelayService {
    /// Creates a new `RelayService` with a 10 s completion timeout.
    #[must_use]
    pub fn new(
        registry: Arc<RestaurantRegistry>,
        sender: Arc<dyn MessageSender>,
        completion: Arc<dyn CompletionClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            conversations: Arc::new(ConversationStore::new()),
            bookings: Arc::new(BookingLog::new()),
            sender,
            completion,
            clock,
            completion_timeout: Duration::from_secs(10),
        }
    }

    /// Overrides the outer timeout applied to each completion.
    #[must_use]
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Returns a reference to the inner [`RestaurantRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<RestaurantRegistry> {
        &self.registry
    }

    /// Returns a reference to the inner [`ConversationStore`].
    #[must_use]
    pub fn conversations(&self) -> &Arc<ConversationStore> {
        &self.conversations
    }

    /// Registers a restaurant, starting open with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the channel is taken.
    pub async fn register(&self, profile: RestaurantProfile) -> Result<ChannelId, GatewayError> {
        let entry = RestaurantEntry::new(profile, self.clock.today(), self.clock.now());
        let channel_id = self.registry.insert(entry).await?;
        info!(channel = %channel_id, "restaurant registered");
        Ok(channel_id)
    }

    // ── Inbound messages ────────────────────────────────────────────────

    /// Handles one inbound text message end to end.
    ///
    /// Messages from the owner are tried as commands first; anything that is
    /// not a command goes through the assistant like a customer message.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    /// Upstream failures are logged and never returned.
    pub async fn handle_inbound(&self, event: &InboundEvent) -> Result<InboundOutcome, GatewayError> {
        let entry_lock = self.registry.get(&event.channel_id).await?;
        let profile = entry_lock.read().await.profile.clone();

        if profile.is_owner(&event.sender_id)
            && let Some(reply) = self.run_owner_command(&entry_lock, &event.channel_id, &event.text).await
        {
            self.deliver(&profile, &event.sender_id, &reply).await;
            info!(
                channel = %event.channel_id,
                command = %excerpt(&event.text, 50),
                "owner command"
            );
            return Ok(InboundOutcome::OwnerCommand { reply });
        }

        self.reply_to_customer(&entry_lock, &profile, event).await
    }

    /// Parses and applies an owner command without sending anything.
    ///
    /// Returns `Ok(None)` when the text is not a command.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    pub async fn owner_command(
        &self,
        channel_id: &ChannelId,
        text: &str,
    ) -> Result<Option<String>, GatewayError> {
        let entry_lock = self.registry.get(channel_id).await?;
        Ok(self.run_owner_command(&entry_lock, channel_id, text).await)
    }

    /// Best-effort read receipt for an inbound message.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel and
    /// [`GatewayError::Upstream`] when the receipt could not be sent.
    pub async fn mark_as_read(&self, event: &InboundEvent) -> Result<(), GatewayError> {
        let entry_lock = self.registry.get(&event.channel_id).await?;
        let profile = entry_lock.read().await.profile.clone();
        self.sender.mark_as_read(&profile, &event.message_id).await
    }

    async fn run_owner_command(
        &self,
        entry_lock: &RwLock<RestaurantEntry>,
        channel_id: &ChannelId,
        text: &str,
    ) -> Option<String> {
        let today = self.clock.today();
        let directive = match directive::parse(text, today) {
            Ok(Some(directive)) => directive,
            Ok(None) => return None,
            Err(invalid) => {
                debug!(channel = %channel_id, ?invalid, "owner sent an unparsable date");
                return Some(invalid.to_string());
            }
        };
        let active_conversations = self.conversations.active_count(channel_id).await;
        let ctx = CommandContext {
            today,
            now: self.clock.now(),
            active_conversations,
        };
        let mut entry = entry_lock.write().await;
        Some(command::execute(&directive, &mut entry, &ctx))
    }

    async fn reply_to_customer(
        &self,
        entry_lock: &RwLock<RestaurantEntry>,
        profile: &RestaurantProfile,
        event: &InboundEvent,
    ) -> Result<InboundOutcome, GatewayError> {
        let today = self.clock.today();
        let constraints = {
            let entry = entry_lock.read().await;
            prompt_context::project(&entry.availability, today)
        };
        let system = build_system_prompt(profile, &constraints);

        let mut messages: Vec<ChatMessage> = self
            .conversations
            .recent(&event.channel_id, &event.sender_id, HISTORY_WINDOW)
            .await
            .into_iter()
            .map(chat_message)
            .collect();
        messages.push(ChatMessage {
            role: ChatRole::User,
            content: event.text.clone(),
        });

        let reply = self.complete_or_fallback(&system, &messages).await;

        let now = self.clock.now();
        for (role, content) in [(Role::Customer, &event.text), (Role::Assistant, &reply)] {
            let turn = Turn {
                role,
                content: content.clone(),
                timestamp: now,
            };
            self.conversations
                .append(&event.channel_id, &event.sender_id, turn)
                .await;
        }
        entry_lock
            .write()
            .await
            .stats
            .record_message(today, DEFAULT_LANGUAGE);

        self.deliver(profile, &event.sender_id, &reply).await;

        let booking_lead = booking::is_booking_request(&event.text);
        if booking_lead {
            self.record_booking(entry_lock, profile, event).await;
        }

        info!(
            channel = %event.channel_id,
            customer = %display_name(event),
            message = %excerpt(&event.text, 80),
            reply = %excerpt(&reply, 80),
            "customer message answered"
        );
        Ok(InboundOutcome::CustomerReply {
            reply,
            booking_lead,
        })
    }

    async fn complete_or_fallback(&self, system: &str, messages: &[ChatMessage]) -> String {
        let call = self.completion.complete(system, messages);
        match tokio::time::timeout(self.completion_timeout, call).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                error!(error = %e, "completion failed, sending fallback reply");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                error!(
                    timeout_ms = self.completion_timeout.as_millis() as u64,
                    "completion timed out, sending fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn record_booking(
        &self,
        entry_lock: &RwLock<RestaurantEntry>,
        profile: &RestaurantProfile,
        event: &InboundEvent,
    ) {
        let lead = BookingLead::new(
            event.channel_id.clone(),
            &event.sender_id,
            &event.sender_name,
            &event.text,
            self.clock.now(),
        );
        let notification = format!(
            "🍽️ Demande de réservation !\n\n👤 {}\n📱 {}\n💬 \"{}\"\n\nRestoBot a répondu automatiquement.",
            display_name(event),
            event.sender_id,
            lead.excerpt
        );
        self.bookings.record(lead).await;
        entry_lock
            .write()
            .await
            .stats
            .record_booking(self.clock.today());

        if !profile.owner_phone.is_empty() {
            self.deliver(profile, &profile.owner_phone, &notification).await;
        }
    }

    /// Sends a message, logging and swallowing any failure.
    async fn deliver(&self, profile: &RestaurantProfile, to: &str, text: &str) {
        if let Err(e) = self.sender.send_text(profile, to, text).await {
            error!(channel = %profile.channel_id, to, error = %e, "failed to send whatsapp message");
        }
    }

    // ── Dashboard ───────────────────────────────────────────────────────

    /// Lists all registered restaurants.
    pub async fn restaurants(&self) -> Vec<RestaurantSummary> {
        self.registry.list().await
    }

    /// Returns a copy of a restaurant's availability record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    pub async fn status(&self, channel_id: &ChannelId) -> Result<AvailabilityRecord, GatewayError> {
        let entry_lock = self.registry.get(channel_id).await?;
        let entry = entry_lock.read().await;
        Ok(entry.availability.clone())
    }

    /// Sets the quick status with the same side effects as the owner
    /// commands (`OUVERT`, `COMPLET CE SOIR`, `COMPLET MIDI`, `FERMÉ`).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    pub async fn set_status(
        &self,
        channel_id: &ChannelId,
        status: Status,
    ) -> Result<AvailabilityRecord, GatewayError> {
        let directive = match status {
            Status::Open => Directive::SetOpen,
            Status::FullTonight => Directive::SetFullTonight,
            Status::FullLunch => Directive::SetFullLunch,
            Status::ClosedToday => Directive::SetClosedToday,
        };
        self.apply(channel_id, &directive).await
    }

    /// Sets the temporary message; an empty message clears it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    pub async fn set_temp_message(
        &self,
        channel_id: &ChannelId,
        message: &str,
    ) -> Result<AvailabilityRecord, GatewayError> {
        let message = message.trim();
        let directive = if message.is_empty() {
            Directive::ClearTempMessage
        } else {
            Directive::SetTempMessage(message.to_string())
        };
        self.apply(channel_id, &directive).await
    }

    /// Adds a closed or fully booked date.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    pub async fn add_date(
        &self,
        channel_id: &ChannelId,
        date: NaiveDate,
        kind: DateKind,
    ) -> Result<AvailabilityRecord, GatewayError> {
        let directive = match kind {
            DateKind::Closed => Directive::SetClosedOnDate(date),
            DateKind::Full => Directive::SetFullOnDate(date),
        };
        self.apply(channel_id, &directive).await
    }

    /// Returns the aggregated dashboard view of a restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    pub async fn dashboard(&self, channel_id: &ChannelId) -> Result<DashboardSnapshot, GatewayError> {
        let entry_lock = self.registry.get(channel_id).await?;
        let (stats, availability) = {
            let mut entry = entry_lock.write().await;
            (
                entry.stats.snapshot(self.clock.today()),
                entry.availability.clone(),
            )
        };
        Ok(DashboardSnapshot {
            stats,
            availability,
            conversations_count: self.conversations.active_count(channel_id).await,
            recent_conversations: self
                .conversations
                .latest(channel_id, DASHBOARD_CONVERSATIONS)
                .await,
        })
    }

    /// Returns the booking leads of a restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] for an unknown channel.
    pub async fn bookings(&self, channel_id: &ChannelId) -> Result<Vec<BookingLead>, GatewayError> {
        self.registry.get(channel_id).await?;
        Ok(self.bookings.for_channel(channel_id).await)
    }

    async fn apply(
        &self,
        channel_id: &ChannelId,
        directive: &Directive,
    ) -> Result<AvailabilityRecord, GatewayError> {
        let entry_lock = self.registry.get(channel_id).await?;
        let ctx = CommandContext {
            today: self.clock.today(),
            now: self.clock.now(),
            active_conversations: 0,
        };
        let mut entry = entry_lock.write().await;
        command::execute(directive, &mut entry, &ctx);
        info!(channel = %channel_id, ?directive, "availability updated from dashboard");
        Ok(entry.availability.clone())
    }
}

fn chat_message(turn: Turn) -> ChatMessage {
    let role = match turn.role {
        Role::Customer => ChatRole::User,
        Role::Assistant => ChatRole::Assistant,
    };
    ChatMessage {
        role,
        content: turn.content,
    }
}

fn display_name(event: &InboundEvent) -> &str {
    if event.sender_name.is_empty() {
        &event.sender_id
    } else {
        &event.sender_name
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

//! WhatsApp Cloud API webhook payloads.
//!
//! Only the fields the relay reads are modelled; everything else in the
//! notification is ignored. Every field defaults so that status callbacks
//! and unknown shapes deserialize to an empty event list instead of a 400.

use serde::{Deserialize, Serialize};

use crate::domain::{ChannelId, InboundEvent};

/// Query parameters of the subscription handshake (`GET /webhook/whatsapp`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyParams {
    /// Must be `subscribe`.
    #[serde(rename = "hub.mode", default)]
    pub mode: Option<String>,
    /// Shared secret configured in the Meta console.
    #[serde(rename = "hub.verify_token", default)]
    pub verify_token: Option<String>,
    /// Value to echo back on success.
    #[serde(rename = "hub.challenge", default)]
    pub challenge: Option<String>,
}

impl VerifyParams {
    /// Returns the challenge when the handshake matches `expected_token`.
    #[must_use]
    pub fn accept(&self, expected_token: &str) -> Option<&str> {
        let subscribed = self.mode.as_deref() == Some("subscribe");
        let token_ok = self.verify_token.as_deref() == Some(expected_token);
        if subscribed && token_ok {
            self.challenge.as_deref()
        } else {
            None
        }
    }
}

/// Top-level webhook notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    /// Notification entries.
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One entry of a notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
    /// Field changes carried by this entry.
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

/// One change of an entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookChange {
    /// Change payload.
    #[serde(default)]
    pub value: ChangeValue,
}

/// Payload of a `messages` change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    /// Receiving business number.
    #[serde(default)]
    pub metadata: Option<ChangeMetadata>,
    /// Sender profiles.
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Inbound messages. Absent on delivery status callbacks.
    #[serde(default)]
    pub messages: Vec<WhatsAppMessage>,
}

/// Receiving endpoint metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeMetadata {
    /// Phone-number id of the restaurant endpoint.
    #[serde(default)]
    pub phone_number_id: String,
}

/// Sender contact card.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
    /// Sender phone number.
    #[serde(default)]
    pub wa_id: String,
    /// Sender profile.
    #[serde(default)]
    pub profile: Option<ContactProfile>,
}

/// Sender profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactProfile {
    /// Display name chosen by the sender.
    #[serde(default)]
    pub name: String,
}

/// One inbound message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhatsAppMessage {
    /// Sender phone number.
    #[serde(default)]
    pub from: String,
    /// Message id, used for read receipts.
    #[serde(default)]
    pub id: String,
    /// Message type (`text`, `image`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Text body, present for `text` messages.
    #[serde(default)]
    pub text: Option<TextBody>,
}

/// Body of a text message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBody {
    /// Message text.
    #[serde(default)]
    pub body: String,
}

impl WebhookPayload {
    /// Extracts the text messages of the notification.
    ///
    /// Non-text messages and changes without a receiving endpoint are
    /// skipped.
    #[must_use]
    pub fn into_events(self) -> Vec<InboundEvent> {
        let mut events = Vec::new();
        for change in self.entry.into_iter().flat_map(|e| e.changes) {
            let value = change.value;
            let Some(metadata) = value.metadata else {
                continue;
            };
            for message in value.messages {
                if message.kind != "text" {
                    continue;
                }
                let Some(text) = message.text else {
                    continue;
                };
                let sender_name = sender_name(&value.contacts, &message.from);
                events.push(InboundEvent {
                    channel_id: ChannelId::new(metadata.phone_number_id.clone()),
                    sender_id: message.from,
                    sender_name,
                    message_id: message.id,
                    text: text.body,
                });
            }
        }
        events
    }
}

fn sender_name(contacts: &[Contact], from: &str) -> String {
    contacts
        .iter()
        .find(|c| c.wa_id == from)
        .or_else(|| contacts.first())
        .and_then(|c| c.profile.as_ref())
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

/// Acknowledgement returned to the webhook caller.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct WebhookAck {
    /// Always `ok`.
    pub status: String,
}

impl WebhookAck {
    /// The `{"status":"ok"}` acknowledgement.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

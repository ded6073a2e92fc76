//! Outbound collaborators: messaging channel and AI completion endpoint.
//!
//! The service layer only sees the [`MessageSender`] and
//! [`CompletionClient`] traits. Production wires [`WhatsAppClient`] and
//! [`AnthropicClient`]; tests plug in in-memory fakes.

pub mod anthropic;
pub mod whatsapp;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::RestaurantProfile;
use crate::error::GatewayError;

pub use anthropic::AnthropicClient;
pub use whatsapp::WhatsAppClient;

/// Sends messages on a restaurant's channel.
#[async_trait]
pub trait MessageSender: Send + Sync + Debug {
    /// Sends a text message to `to` from the restaurant's endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Upstream`] when the request fails, times out
    /// or is rejected.
    async fn send_text(
        &self,
        profile: &RestaurantProfile,
        to: &str,
        text: &str,
    ) -> Result<(), GatewayError>;

    /// Marks an inbound message as read.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Upstream`] when the request fails.
    async fn mark_as_read(
        &self,
        profile: &RestaurantProfile,
        message_id: &str,
    ) -> Result<(), GatewayError>;
}

/// Author of a message in a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The customer.
    User,
    /// The assistant.
    Assistant,
}

/// One message of a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Text.
    pub content: String,
}

/// Produces assistant replies.
#[async_trait]
pub trait CompletionClient: Send + Sync + Debug {
    /// Returns the assistant's reply to `messages` under `system`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Upstream`] on transport failure, non-success
    /// status or an empty answer.
    async fn complete(&self, system: &str, messages: &[ChatMessage])
    -> Result<String, GatewayError>;
}

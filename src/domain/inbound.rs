//! Inbound message event, independent of the webhook wire format.

use super::ChannelId;

/// One text message received on a restaurant's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Restaurant endpoint the message was sent to.
    pub channel_id: ChannelId,
    /// Sender phone number.
    pub sender_id: String,
    /// Sender profile name, possibly empty.
    pub sender_name: String,
    /// Channel message id, used for read receipts.
    pub message_id: String,
    /// Message body.
    pub text: String,
}

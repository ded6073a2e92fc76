//! Short per-customer chat history.
//!
//! [`ConversationStore`] keeps one bounded [`ConversationLog`] per
//! restaurant × customer phone. Logs are created lazily on the first append
//! and live for the whole process.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::ChannelId;

/// Maximum number of turns kept per conversation.
pub const MAX_TURNS: usize = 20;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Message written by the customer.
    Customer,
    /// Reply produced by the assistant.
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    /// Who wrote the message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Insertion-ordered turns, FIFO-truncated to [`MAX_TURNS`].
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: VecDeque<Turn>,
}

impl ConversationLog {
    /// Appends a turn, dropping the oldest ones beyond the cap.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > MAX_TURNS {
            self.turns.pop_front();
        }
    }

    /// Returns up to the last `n` turns, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).cloned().collect()
    }

    /// Returns the newest turn.
    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    /// Number of stored turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if no turn was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Dashboard view of one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    /// Customer phone number.
    pub customer: String,
    /// Number of stored turns.
    pub turns: usize,
    /// Newest turn.
    pub last: Turn,
}

type ConversationKey = (ChannelId, String);

/// All conversations of the process.
#[derive(Debug, Default)]
pub struct ConversationStore {
    logs: RwLock<HashMap<ConversationKey, ConversationLog>>,
}

impl ConversationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the conversation, creating it if needed.
    pub async fn append(&self, channel: &ChannelId, customer: &str, turn: Turn) {
        let mut logs = self.logs.write().await;
        logs.entry((channel.clone(), customer.to_string()))
            .or_default()
            .push(turn);
    }

    /// Returns up to the last `n` turns of a conversation.
    pub async fn recent(&self, channel: &ChannelId, customer: &str, n: usize) -> Vec<Turn> {
        let logs = self.logs.read().await;
        logs.get(&(channel.clone(), customer.to_string()))
            .map(|log| log.recent(n))
            .unwrap_or_default()
    }

    /// Number of conversations held for a restaurant.
    pub async fn active_count(&self, channel: &ChannelId) -> usize {
        let logs = self.logs.read().await;
        logs.keys().filter(|(c, _)| c == channel).count()
    }

    /// Most recently active conversations of a restaurant, newest first.
    pub async fn latest(&self, channel: &ChannelId, limit: usize) -> Vec<ConversationSummary> {
        let logs = self.logs.read().await;
        let mut summaries: Vec<ConversationSummary> = logs
            .iter()
            .filter(|((c, _), _)| c == channel)
            .filter_map(|((_, customer), log)| {
                log.last().map(|last| ConversationSummary {
                    customer: customer.clone(),
                    turns: log.len(),
                    last: last.clone(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| b.last.timestamp.cmp(&a.last.timestamp));
        summaries.truncate(limit);
        summaries
    }
}

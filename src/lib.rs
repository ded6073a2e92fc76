//! # restobot-gateway
//!
//! WhatsApp relay that answers restaurant customers with an AI assistant
//! and lets the owner steer availability with short text commands.
//!
//! Inbound messages arrive on the WhatsApp Cloud API webhook. A message
//! from the restaurant's owner phone is first tried as a command (`COMPLET
//! CE SOIR`, `FERMÉ 01/03`, `MESSAGE ...`); everything else is answered by
//! the assistant, whose system prompt carries the current availability.
//! A password-protected dashboard API exposes the same controls.
//!
//! ## Architecture
//!
//! ```text
//! WhatsApp Cloud API        Dashboard client
//!     │                         │
//!     ├── Webhook handlers      ├── Dashboard handlers (api/)
//!     │                         │
//!     └──────── RelayService (service/) ────────┐
//!                   │                           │
//!     directive::parse → command::execute       ├── WhatsAppClient  (outbound/)
//!     prompt_context::project (domain/)         └── AnthropicClient (outbound/)
//!                   │
//!     RestaurantRegistry, ConversationStore, BookingLog (in memory)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod outbound;
pub mod service;

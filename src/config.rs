//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Secrets default to empty strings; an
//! empty secret disables the feature that needs it.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::{ChannelId, RestaurantProfile};

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,

    /// Anthropic API key.
    pub anthropic_api_key: String,

    /// Model used for customer replies.
    pub claude_model: String,

    /// Maximum tokens per completion.
    pub max_tokens: u32,

    /// Token echoed back during the WhatsApp webhook handshake.
    pub whatsapp_verify_token: String,

    /// Graph API version segment (e.g. `v22.0`).
    pub whatsapp_api_version: String,

    /// Shared secret for the dashboard API. Empty locks the dashboard.
    pub dashboard_password: String,

    /// Timeout for sending a WhatsApp message.
    pub send_timeout: Duration,

    /// Timeout for a read receipt.
    pub read_receipt_timeout: Duration,

    /// Timeout for an AI completion.
    pub completion_timeout: Duration,

    /// The restaurant served by this process.
    pub restaurant: RestaurantProfile,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| format!("0.0.0.0:{}", parse_env("PORT", 8000_u16)))
            .parse()?;

        let log_json = env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json");

        Ok(Self {
            listen_addr,
            log_json,
            anthropic_api_key: env_or("ANTHROPIC_API_KEY", ""),
            claude_model: env_or("CLAUDE_MODEL", "claude-sonnet-4-20250514"),
            max_tokens: parse_env("ANTHROPIC_MAX_TOKENS", 512),
            whatsapp_verify_token: env_or("WHATSAPP_VERIFY_TOKEN", "restobot-verify-2026"),
            whatsapp_api_version: env_or("WHATSAPP_API_VERSION", "v22.0"),
            dashboard_password: env_or("DASHBOARD_PASSWORD", ""),
            send_timeout: Duration::from_secs(parse_env("SEND_TIMEOUT_SECS", 10)),
            read_receipt_timeout: Duration::from_secs(parse_env("READ_RECEIPT_TIMEOUT_SECS", 5)),
            completion_timeout: Duration::from_secs(parse_env("COMPLETION_TIMEOUT_SECS", 10)),
            restaurant: restaurant_from_env(),
        })
    }
}

/// Loads the single restaurant profile served by this process.
fn restaurant_from_env() -> RestaurantProfile {
    RestaurantProfile {
        name: env_or("RESTAURANT_NAME", "Le Cosi Nice"),
        channel_id: ChannelId::new(env_or("WHATSAPP_PHONE_NUMBER_ID", "1025551323971723")),
        access_token: env_or("WHATSAPP_ACCESS_TOKEN", ""),
        owner_phone: env_or("OWNER_PHONE", ""),
        description: env_or("RESTAURANT_DESCRIPTION", ""),
        menu: env_or("RESTAURANT_MENU", ""),
        hours: env_or("RESTAURANT_HOURS", ""),
        address: env_or("RESTAURANT_ADDRESS", ""),
        phone: env_or("RESTAURANT_PHONE", ""),
        tone: env_or("RESTAURANT_TONE", ""),
        languages: env_or("RESTAURANT_LANGUAGES", "français, anglais, italien"),
        special_info: env_or("RESTAURANT_SPECIAL_INFO", ""),
        booking_link: env_or("RESTAURANT_BOOKING_LINK", ""),
        allergens_policy: env_or(
            "RESTAURANT_ALLERGENS_POLICY",
            "Nous prenons les allergies très au sérieux. Merci de préciser vos allergies, \
             notre chef adapte les plats.",
        ),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

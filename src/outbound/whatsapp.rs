//! WhatsApp Cloud API client.
//!
//! Both operations post to
//! `https://graph.facebook.com/{version}/{phone_number_id}/messages` with the
//! restaurant's bearer token. Requests are never retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::MessageSender;
use crate::domain::RestaurantProfile;
use crate::error::GatewayError;

/// Graph API host.
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com";

/// Connect timeout shared by every request.
const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct ReadReceiptRequest<'a> {
    messaging_product: &'static str,
    status: &'static str,
    message_id: &'a str,
}

/// Client for the WhatsApp Cloud API messages endpoint.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    send_timeout: Duration,
    read_receipt_timeout: Duration,
}

impl WhatsAppClient {
    /// Creates a client for the given Graph API version.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be built.
    pub fn new(
        api_version: String,
        send_timeout: Duration,
        read_receipt_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: GRAPH_API_BASE.to_string(),
            api_version,
            send_timeout,
            read_receipt_timeout,
        })
    }

    /// Overrides the API host (for staging or a local mock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn messages_url(&self, profile: &RestaurantProfile) -> String {
        format!(
            "{}/{}/{}/messages",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            profile.channel_id
        )
    }

    async fn post<T: Serialize + Sync>(
        &self,
        profile: &RestaurantProfile,
        body: &T,
        timeout: Duration,
    ) -> Result<(), GatewayError> {
        let resp = self
            .client
            .post(self.messages_url(profile))
            .bearer_auth(&profile.access_token)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            warn!(%status, %detail, "whatsapp: request rejected");
            return Err(GatewayError::Upstream(format!(
                "whatsapp returned {status}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(
        &self,
        profile: &RestaurantProfile,
        to: &str,
        text: &str,
    ) -> Result<(), GatewayError> {
        let body = TextMessageRequest {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            kind: "text",
            text: TextBody { body: text },
        };
        self.post(profile, &body, self.send_timeout).await?;
        debug!(to, channel = %profile.channel_id, "whatsapp: message sent");
        Ok(())
    }

    async fn mark_as_read(
        &self,
        profile: &RestaurantProfile,
        message_id: &str,
    ) -> Result<(), GatewayError> {
        let body = ReadReceiptRequest {
            messaging_product: "whatsapp",
            status: "read",
            message_id,
        };
        self.post(profile, &body, self.read_receipt_timeout).await
    }
}

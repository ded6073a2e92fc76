//! WhatsApp webhook handlers: subscription handshake and notifications.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, info, warn};

use crate::api::dto::{VerifyParams, WebhookAck, WebhookPayload};
use crate::app_state::AppState;
use crate::domain::InboundEvent;
use crate::service::RelayService;

/// `GET /webhook/whatsapp` — Subscription handshake.
#[utoipa::path(
    get,
    path = "/webhook/whatsapp",
    tag = "Webhook",
    summary = "Webhook verification",
    description = "Echoes `hub.challenge` when `hub.mode` is `subscribe` and `hub.verify_token` matches the configured token.",
    params(
        ("hub.mode" = Option<String>, Query, description = "Must be `subscribe`"),
        ("hub.verify_token" = Option<String>, Query, description = "Configured verify token"),
        ("hub.challenge" = Option<String>, Query, description = "Value echoed on success"),
    ),
    responses(
        (status = 200, description = "Challenge echoed", body = String),
        (status = 403, description = "Token or mode mismatch"),
    )
)]
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    match params.accept(&state.verify_token) {
        Some(challenge) => {
            info!("webhook verified");
            (StatusCode::OK, challenge.to_string()).into_response()
        }
        None => {
            warn!(mode = ?params.mode, "webhook verification rejected");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// `POST /webhook/whatsapp` — Inbound notification.
///
/// Always acknowledges immediately; each text message is processed on its
/// own task so the channel never waits on the assistant.
#[utoipa::path(
    post,
    path = "/webhook/whatsapp",
    tag = "Webhook",
    summary = "Receive messages",
    description = "Accepts a WhatsApp Cloud API notification. Text messages are processed asynchronously; anything else is ignored.",
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Notification accepted", body = WebhookAck),
    )
)]
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Json<WebhookAck> {
    match serde_json::from_slice::<WebhookPayload>(&body) {
        Ok(payload) => {
            for event in payload.into_events() {
                let service = std::sync::Arc::clone(&state.relay_service);
                tokio::spawn(async move { process_event(&service, event).await });
            }
        }
        Err(e) => debug!(error = %e, "ignoring unparsable webhook body"),
    }
    Json(WebhookAck::ok())
}

async fn process_event(service: &RelayService, event: InboundEvent) {
    if let Err(e) = service.mark_as_read(&event).await {
        debug!(message_id = %event.message_id, error = %e, "read receipt not sent");
    }
    if let Err(e) = service.handle_inbound(&event).await {
        warn!(channel = %event.channel_id, error = %e, "inbound message dropped");
    }
}

/// Webhook routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/webhook/whatsapp", get(verify_webhook).post(receive_webhook))
}

//! End-to-end tests: the full router on an ephemeral port, driven over HTTP
//! with in-memory messaging and completion fakes.

#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use serde_json::{Value, json};

use restobot_gateway::api;
use restobot_gateway::app_state::AppState;
use restobot_gateway::domain::{ChannelId, FixedClock, RestaurantProfile, RestaurantRegistry};
use restobot_gateway::error::GatewayError;
use restobot_gateway::outbound::{ChatMessage, CompletionClient, MessageSender};
use restobot_gateway::service::RelayService;

const CHANNEL: &str = "1025551323971723";
const OWNER: &str = "33600000000";
const CUSTOMER: &str = "33611111111";
const VERIFY_TOKEN: &str = "verify-me";
const PASSWORD: &str = "s3cret";

#[derive(Debug, Default)]
struct Outbox {
    sent: Mutex<Vec<(String, String)>>,
}

impl Outbox {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MessageSender for Outbox {
    async fn send_text(
        &self,
        _profile: &RestaurantProfile,
        to: &str,
        text: &str,
    ) -> Result<(), GatewayError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((to.to_string(), text.to_string()));
        }
        Ok(())
    }

    async fn mark_as_read(
        &self,
        _profile: &RestaurantProfile,
        _message_id: &str,
    ) -> Result<(), GatewayError> {
        Ok(())
    }
}

#[derive(Debug)]
struct EchoCompletion;

#[async_trait]
impl CompletionClient for EchoCompletion {
    async fn complete(
        &self,
        _system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, GatewayError> {
        Ok(format!("Réponse n°{}", messages.len()))
    }
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    outbox: Arc<Outbox>,
}

async fn start(dashboard_password: &str) -> TestServer {
    let outbox = Arc::new(Outbox::default());
    let Some(today) = NaiveDate::from_ymd_opt(2026, 2, 24) else {
        panic!("valid date");
    };
    let service = RelayService::new(
        Arc::new(RestaurantRegistry::new()),
        Arc::clone(&outbox) as Arc<dyn MessageSender>,
        Arc::new(EchoCompletion),
        Arc::new(FixedClock::new(today)),
    );
    let profile = RestaurantProfile {
        name: "Le Cosi Nice".to_string(),
        channel_id: ChannelId::from(CHANNEL),
        owner_phone: OWNER.to_string(),
        ..RestaurantProfile::default()
    };
    if service.register(profile).await.is_err() {
        panic!("register failed");
    }

    let state = AppState {
        relay_service: Arc::new(service),
        verify_token: Arc::from(VERIFY_TOKEN),
        dashboard_password: Arc::from(dashboard_password),
    };
    let app = Router::new().merge(api::build_router()).with_state(state);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        outbox,
    }
}

fn notification(from: &str, text: &str) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {"display_phone_number": "33400000000", "phone_number_id": CHANNEL},
                    "contacts": [{"profile": {"name": "Marie"}, "wa_id": from}],
                    "messages": [{
                        "from": from,
                        "id": "wamid.TEST",
                        "timestamp": "1772000000",
                        "type": "text",
                        "text": {"body": text}
                    }]
                }
            }]
        }]
    })
}

impl TestServer {
    async fn get_json(&self, path: &str) -> (u16, Value) {
        let Ok(resp) = self
            .client
            .get(format!("{}{path}", self.base))
            .header("x-dashboard-password", PASSWORD)
            .send()
            .await
        else {
            panic!("GET {path} failed");
        };
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let Ok(resp) = self
            .client
            .post(format!("{}{path}", self.base))
            .header("x-dashboard-password", PASSWORD)
            .json(body)
            .send()
            .await
        else {
            panic!("POST {path} failed");
        };
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// Waits until the outbox holds `count` messages.
    async fn wait_for_outbox(&self, count: usize) -> Vec<(String, String)> {
        for _ in 0..100 {
            let sent = self.outbox.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("outbox never reached {count} messages: {:?}", self.outbox.sent());
    }
}

#[tokio::test]
async fn health_and_banner() {
    let server = start(PASSWORD).await;
    let (status, body) = server.get_json("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = server.get_json("/").await;
    assert_eq!(status, 200);
    assert_eq!(body["restaurants"], 1);
}

#[tokio::test]
async fn webhook_handshake() {
    let server = start(PASSWORD).await;
    let url = format!(
        "{}/webhook/whatsapp?hub.mode=subscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=4242",
        server.base
    );
    let Ok(resp) = server.client.get(url).send().await else {
        panic!("request failed");
    };
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.text().await.unwrap_or_default(), "4242");

    let url = format!(
        "{}/webhook/whatsapp?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=4242",
        server.base
    );
    let Ok(resp) = server.client.get(url).send().await else {
        panic!("request failed");
    };
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn owner_command_over_webhook_updates_status() {
    let server = start(PASSWORD).await;
    let (status, body) = server
        .post_json("/webhook/whatsapp", &notification(OWNER, "complet ce soir"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));

    let sent = server.wait_for_outbox(1).await;
    assert_eq!(sent.first().map(|(to, _)| to.as_str()), Some(OWNER));

    let (status, body) = server
        .get_json(&format!("/api/v1/restaurants/{CHANNEL}/status"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "full_tonight");
    assert_eq!(body["full_dates"]["2026-02-24"], "soir");
}

#[tokio::test]
async fn customer_message_is_answered_and_counted() {
    let server = start(PASSWORD).await;
    let (status, _) = server
        .post_json(
            "/webhook/whatsapp",
            &notification(CUSTOMER, "Bonjour, je voudrais réserver une table"),
        )
        .await;
    assert_eq!(status, 200);

    // reply to the customer, then the booking alert to the owner
    let sent = server.wait_for_outbox(2).await;
    assert!(sent.contains(&(CUSTOMER.to_string(), "Réponse n°1".to_string())));
    assert!(sent.iter().any(|(to, _)| to == OWNER));

    let (status, body) = server
        .get_json(&format!("/api/v1/restaurants/{CHANNEL}/dashboard"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["messages_today"], 1);
    assert_eq!(body["bookings_today"], 1);
    assert_eq!(body["conversations_count"], 1);

    let (status, body) = server
        .get_json(&format!("/api/v1/restaurants/{CHANNEL}/bookings"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["customer_name"], "Marie");
}

#[tokio::test]
async fn malformed_webhook_body_is_still_acknowledged() {
    let server = start(PASSWORD).await;
    let Ok(resp) = server
        .client
        .post(format!("{}/webhook/whatsapp", server.base))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn dashboard_requires_password() {
    let server = start(PASSWORD).await;
    let Ok(resp) = server
        .client
        .get(format!("{}/api/v1/restaurants", server.base))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(resp.status().as_u16(), 401);

    let Ok(resp) = server
        .client
        .get(format!("{}/api/v1/restaurants", server.base))
        .header("x-dashboard-password", "nope")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(resp.status().as_u16(), 401);

    let (status, body) = server.get_json("/api/v1/restaurants").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["channel_id"], CHANNEL);
}

#[tokio::test]
async fn empty_password_locks_dashboard() {
    let server = start("").await;
    let Ok(resp) = server
        .client
        .get(format!("{}/api/v1/restaurants", server.base))
        .header("x-dashboard-password", "")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn dashboard_writes() {
    let server = start(PASSWORD).await;
    let base = format!("/api/v1/restaurants/{CHANNEL}");

    let (status, body) = server
        .post_json(&format!("{base}/status"), &json!({"status": "closed_today"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "closed_today");
    assert_eq!(body["closed_dates"], json!(["2026-02-24"]));

    let (status, body) = server
        .post_json(
            &format!("{base}/dates"),
            &json!({"date": "2026-03-07", "type": "full"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["full_dates"]["2026-03-07"], "journée");

    let (status, body) = server
        .post_json(&format!("{base}/message"), &json!({"message": "Terrasse ouverte"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["temp_message"], "Terrasse ouverte");

    let (status, body) = server
        .post_json(&format!("{base}/status"), &json!({"status": "open"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "open");
    assert_eq!(body["closed_dates"], json!(["2026-02-24"]));
}

#[tokio::test]
async fn unknown_channel_is_404() {
    let server = start(PASSWORD).await;
    let (status, body) = server.get_json("/api/v1/restaurants/999/status").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);
}

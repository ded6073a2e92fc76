//! restobot-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WhatsApp webhook and the dashboard.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use restobot_gateway::api;
use restobot_gateway::app_state::AppState;
use restobot_gateway::config::GatewayConfig;
use restobot_gateway::domain::{RestaurantRegistry, SystemClock};
use restobot_gateway::outbound::{AnthropicClient, WhatsAppClient};
use restobot_gateway::service::RelayService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting restobot-gateway");

    if config.anthropic_api_key.is_empty() {
        tracing::warn!("ANTHROPIC_API_KEY is not set, customers will get the fallback reply");
    }
    if config.dashboard_password.is_empty() {
        tracing::warn!("DASHBOARD_PASSWORD is not set, the dashboard API is locked");
    }

    // Build outbound clients
    let sender = WhatsAppClient::new(
        config.whatsapp_api_version.clone(),
        config.send_timeout,
        config.read_receipt_timeout,
    )?;
    let completion = AnthropicClient::new(
        config.anthropic_api_key.clone(),
        config.claude_model.clone(),
        config.max_tokens,
        config.completion_timeout,
    )?;

    // Build service layer
    let relay_service = RelayService::new(
        Arc::new(RestaurantRegistry::new()),
        Arc::new(sender),
        Arc::new(completion),
        Arc::new(SystemClock),
    )
    .with_completion_timeout(config.completion_timeout);

    let channel_id = relay_service.register(config.restaurant.clone()).await?;
    tracing::info!(
        channel = %channel_id,
        name = %config.restaurant.name,
        "restaurant loaded"
    );

    // Build application state
    let app_state = AppState {
        relay_service: Arc::new(relay_service),
        verify_token: Arc::from(config.whatsapp_verify_token.as_str()),
        dashboard_password: Arc::from(config.dashboard_password.as_str()),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

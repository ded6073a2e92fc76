//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service for all business logic.
    pub relay_service: Arc<RelayService>,
    /// Token expected in the webhook subscription handshake.
    pub verify_token: Arc<str>,
    /// Password expected in the `x-dashboard-password` header. Empty locks
    /// the dashboard.
    pub dashboard_password: Arc<str>,
}

//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::handlers::{dashboard, system, webhook};

/// Generated OpenAPI description, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "restobot-gateway",
        description = "WhatsApp relay with an AI restaurant assistant and an owner dashboard"
    ),
    paths(
        system::root_handler,
        system::health_handler,
        webhook::verify_webhook,
        webhook::receive_webhook,
        dashboard::list_restaurants,
        dashboard::get_status,
        dashboard::set_status,
        dashboard::set_message,
        dashboard::add_date,
        dashboard::get_dashboard,
        dashboard::list_bookings,
    ),
    tags(
        (name = "System", description = "Banner and health"),
        (name = "Webhook", description = "WhatsApp Cloud API callbacks"),
        (name = "Dashboard", description = "Owner dashboard, requires `x-dashboard-password`"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/health",
            "/webhook/whatsapp",
            "/api/v1/restaurants",
            "/api/v1/restaurants/{channel_id}/status",
            "/api/v1/restaurants/{channel_id}/message",
            "/api/v1/restaurants/{channel_id}/dates",
            "/api/v1/restaurants/{channel_id}/dashboard",
            "/api/v1/restaurants/{channel_id}/bookings",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

//! HTTP layer: route handlers, DTOs, and router composition.
//!
//! Dashboard endpoints are mounted under `/api/v1`; the webhook and system
//! endpoints live at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete router with all endpoints.
///
/// With the `swagger-ui` feature, the interactive docs are served at
/// `/docs` and the raw document at `/api/v1/openapi.json`.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::webhook::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs")
                .url("/api/v1/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}

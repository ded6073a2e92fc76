//! Owner dashboard handlers: status, temporary message, dates, activity.
//!
//! Every route requires the `x-dashboard-password` header.

use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::warn;

use crate::api::dto::{
    AddDateRequest, AvailabilityDto, BookingDto, BookingListResponse, DashboardResponse,
    RestaurantDto, RestaurantListResponse, SetMessageRequest, SetStatusRequest,
};
use crate::app_state::AppState;
use crate::domain::ChannelId;
use crate::error::{ErrorResponse, GatewayError};

/// Header carrying the dashboard password.
pub const PASSWORD_HEADER: &str = "x-dashboard-password";

/// Proof that the request carried the dashboard password.
#[derive(Debug, Clone, Copy)]
pub struct DashboardAuth;

impl FromRequestParts<AppState> for DashboardAuth {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.dashboard_password.is_empty() {
            return Err(GatewayError::Unauthorized);
        }
        let provided = parts
            .headers
            .get(PASSWORD_HEADER)
            .and_then(|h| h.to_str().ok());
        match provided {
            Some(password) if password == &*state.dashboard_password => Ok(Self),
            _ => {
                warn!(uri = %parts.uri, "dashboard request rejected");
                Err(GatewayError::Unauthorized)
            }
        }
    }
}

/// `GET /restaurants` — List registered restaurants.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without a valid password.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    tag = "Dashboard",
    summary = "List restaurants",
    description = "Returns every registered restaurant with its current status.",
    params(("x-dashboard-password" = String, Header, description = "Dashboard password")),
    responses(
        (status = 200, description = "Restaurant list", body = RestaurantListResponse),
        (status = 401, description = "Missing or wrong password", body = ErrorResponse),
    )
)]
pub async fn list_restaurants(
    _auth: DashboardAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let data = state
        .relay_service
        .restaurants()
        .await
        .into_iter()
        .map(RestaurantDto::from)
        .collect();
    Ok((StatusCode::OK, Json(RestaurantListResponse { data })))
}

/// `GET /restaurants/{channel_id}/status` — Current availability.
///
/// # Errors
///
/// Returns [`GatewayError`] if unauthorized or the channel is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{channel_id}/status",
    tag = "Dashboard",
    summary = "Get availability",
    params(
        ("channel_id" = String, Path, description = "Restaurant channel id"),
        ("x-dashboard-password" = String, Header, description = "Dashboard password"),
    ),
    responses(
        (status = 200, description = "Availability record", body = AvailabilityDto),
        (status = 401, description = "Missing or wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown channel", body = ErrorResponse),
    )
)]
pub async fn get_status(
    _auth: DashboardAuth,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .relay_service
        .status(&ChannelId::new(channel_id))
        .await?;
    Ok((StatusCode::OK, Json(AvailabilityDto::from(record))))
}

/// `POST /restaurants/{channel_id}/status` — Set the quick status.
///
/// # Errors
///
/// Returns [`GatewayError`] if unauthorized or the channel is unknown.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants/{channel_id}/status",
    tag = "Dashboard",
    summary = "Set status",
    description = "Same effect as the matching owner command: `full_tonight` and `full_lunch` also mark today in the full dates, `closed_today` appends today to the closed dates.",
    params(
        ("channel_id" = String, Path, description = "Restaurant channel id"),
        ("x-dashboard-password" = String, Header, description = "Dashboard password"),
    ),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Updated availability", body = AvailabilityDto),
        (status = 401, description = "Missing or wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown channel", body = ErrorResponse),
    )
)]
pub async fn set_status(
    _auth: DashboardAuth,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .relay_service
        .set_status(&ChannelId::new(channel_id), req.status)
        .await?;
    Ok((StatusCode::OK, Json(AvailabilityDto::from(record))))
}

/// `POST /restaurants/{channel_id}/message` — Set or clear the temporary
/// message.
///
/// # Errors
///
/// Returns [`GatewayError`] if unauthorized or the channel is unknown.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants/{channel_id}/message",
    tag = "Dashboard",
    summary = "Set temporary message",
    params(
        ("channel_id" = String, Path, description = "Restaurant channel id"),
        ("x-dashboard-password" = String, Header, description = "Dashboard password"),
    ),
    request_body = SetMessageRequest,
    responses(
        (status = 200, description = "Updated availability", body = AvailabilityDto),
        (status = 401, description = "Missing or wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown channel", body = ErrorResponse),
    )
)]
pub async fn set_message(
    _auth: DashboardAuth,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(req): Json<SetMessageRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .relay_service
        .set_temp_message(&ChannelId::new(channel_id), &req.message)
        .await?;
    Ok((StatusCode::OK, Json(AvailabilityDto::from(record))))
}

/// `POST /restaurants/{channel_id}/dates` — Add a closed or full date.
///
/// # Errors
///
/// Returns [`GatewayError`] if unauthorized or the channel is unknown.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants/{channel_id}/dates",
    tag = "Dashboard",
    summary = "Add a date",
    description = "`closed` appends to the closed dates; `full` marks the whole day as fully booked.",
    params(
        ("channel_id" = String, Path, description = "Restaurant channel id"),
        ("x-dashboard-password" = String, Header, description = "Dashboard password"),
    ),
    request_body = AddDateRequest,
    responses(
        (status = 200, description = "Updated availability", body = AvailabilityDto),
        (status = 401, description = "Missing or wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown channel", body = ErrorResponse),
    )
)]
pub async fn add_date(
    _auth: DashboardAuth,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(req): Json<AddDateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .relay_service
        .add_date(&ChannelId::new(channel_id), req.date, req.kind)
        .await?;
    Ok((StatusCode::OK, Json(AvailabilityDto::from(record))))
}

/// `GET /restaurants/{channel_id}/dashboard` — Stats and recent activity.
///
/// # Errors
///
/// Returns [`GatewayError`] if unauthorized or the channel is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{channel_id}/dashboard",
    tag = "Dashboard",
    summary = "Dashboard overview",
    params(
        ("channel_id" = String, Path, description = "Restaurant channel id"),
        ("x-dashboard-password" = String, Header, description = "Dashboard password"),
    ),
    responses(
        (status = 200, description = "Dashboard overview", body = DashboardResponse),
        (status = 401, description = "Missing or wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown channel", body = ErrorResponse),
    )
)]
pub async fn get_dashboard(
    _auth: DashboardAuth,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let snapshot = state
        .relay_service
        .dashboard(&ChannelId::new(channel_id))
        .await?;
    Ok((StatusCode::OK, Json(DashboardResponse::from(snapshot))))
}

/// `GET /restaurants/{channel_id}/bookings` — Booking leads.
///
/// # Errors
///
/// Returns [`GatewayError`] if unauthorized or the channel is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{channel_id}/bookings",
    tag = "Dashboard",
    summary = "List booking leads",
    params(
        ("channel_id" = String, Path, description = "Restaurant channel id"),
        ("x-dashboard-password" = String, Header, description = "Dashboard password"),
    ),
    responses(
        (status = 200, description = "Booking leads", body = BookingListResponse),
        (status = 401, description = "Missing or wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown channel", body = ErrorResponse),
    )
)]
pub async fn list_bookings(
    _auth: DashboardAuth,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let data: Vec<BookingDto> = state
        .relay_service
        .bookings(&ChannelId::new(channel_id))
        .await?
        .into_iter()
        .map(BookingDto::from)
        .collect();
    let total = data.len();
    Ok((StatusCode::OK, Json(BookingListResponse { data, total })))
}

/// Dashboard routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{channel_id}/status",
            get(get_status).post(set_status),
        )
        .route("/restaurants/{channel_id}/message", post(set_message))
        .route("/restaurants/{channel_id}/dates", post(add_date))
        .route("/restaurants/{channel_id}/dashboard", get(get_dashboard))
        .route("/restaurants/{channel_id}/bookings", get(list_bookings))
}
